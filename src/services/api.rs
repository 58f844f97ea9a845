//! Blocking client for the order backend
//!
//! Endpoints:
//! - `GET  /admin/orders`            order listing (JSON array)
//! - `GET  /admin/orders/{id}/label` single shipping label (PDF)
//! - `POST /admin/labels/batch`      batch labels for a JSON array of ids (PDF)

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, info};

use crate::services::order_source::decode_orders;
use crate::services::Config;
use crate::types::{Order, OrderdashError, Result};

/// HTTP client bound to one backend
pub struct OrdersApi {
    client: Client,
    base: Url,
    base_str: String,
}

impl OrdersApi {
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.api_base)
            .map_err(|e| OrderdashError::Config(format!("Invalid api_base: {}", e)))?;
        if base.cannot_be_a_base() {
            return Err(OrderdashError::Config(format!(
                "api_base cannot carry paths: {}",
                config.api_base
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("orderdash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OrderdashError::Network(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            base,
            base_str: config.api_base.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_str
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn orders_url(&self) -> Url {
        self.endpoint(&["admin", "orders"])
    }

    pub fn label_url(&self, order_id: &str) -> Url {
        self.endpoint(&["admin", "orders", order_id, "label"])
    }

    pub fn batch_labels_url(&self) -> Url {
        self.endpoint(&["admin", "labels", "batch"])
    }

    /// Fetch the full order listing
    pub fn fetch_orders(&self) -> Result<Vec<Order>> {
        let url = self.orders_url();
        debug!(%url, "fetching orders");

        let response = self.client.get(url).send()?;
        let response = ensure_success(response, "Failed to fetch orders")?;
        let body: Value = response
            .json()
            .map_err(|e| OrderdashError::Decode(format!("Invalid orders response: {}", e)))?;

        let orders = decode_orders(body)?;
        info!(count = orders.len(), "fetched orders");
        Ok(orders)
    }

    /// Download the shipping label for one order
    pub fn fetch_label(&self, order_id: &str) -> Result<Vec<u8>> {
        let url = self.label_url(order_id);
        debug!(%url, "fetching label");

        let response = self.client.get(url).send()?;
        let response = ensure_success(response, "Label request failed")?;
        Ok(response.bytes()?.to_vec())
    }

    /// Download one combined label document for several orders
    pub fn fetch_batch_labels(&self, order_ids: &[String]) -> Result<Vec<u8>> {
        let url = self.batch_labels_url();
        debug!(%url, count = order_ids.len(), "requesting batch labels");

        let response = self.client.post(url).json(order_ids).send()?;
        let response = ensure_success(response, "Batch label failed")?;
        Ok(response.bytes()?.to_vec())
    }
}

/// Map non-2xx responses to `OrderdashError::Http` ("<what> (<status>)")
fn ensure_success(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(OrderdashError::Http {
            status: status.as_u16(),
            message: format!("{} ({})", what, status.as_u16()),
        })
    }
}
