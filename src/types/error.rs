use thiserror::Error;

/// orderdash error types
#[derive(Error, Debug)]
pub enum OrderdashError {
    /// Backend answered with a non-success status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Request never produced a response (DNS, TLS, timeout, ...)
    #[error("network error: {0}")]
    Network(String),

    /// Response or snapshot body was not an order list
    #[error("decode error: {0}")]
    Decode(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Batch label printing requested with nothing selected
    #[error("Select at least one order")]
    EmptySelection,
}

impl From<reqwest::Error> for OrderdashError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Result type alias for orderdash
pub type Result<T> = std::result::Result<T, OrderdashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OrderdashError::Decode("expected array".into());
        assert_eq!(err.to_string(), "decode error: expected array");
    }

    #[test]
    fn test_http_error_uses_message() {
        let err = OrderdashError::Http {
            status: 503,
            message: "Failed to fetch orders (503)".into(),
        };
        assert_eq!(err.to_string(), "Failed to fetch orders (503)");
    }

    #[test]
    fn test_empty_selection_display() {
        assert_eq!(
            OrderdashError::EmptySelection.to_string(),
            "Select at least one order"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: OrderdashError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }
}
