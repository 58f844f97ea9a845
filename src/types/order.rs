//! Order records as served by the backend's `/admin/orders` listing
//!
//! Decoding is lenient: amounts that are absent, null or non-numeric become 0,
//! absent `items` become an empty list, and scalar ids/statuses are
//! stringified. A record never fails to decode as long as it is a JSON object.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Status tag that marks an order as paid (exact, case-sensitive)
pub const PAID_STATUS: &str = "PAID";

/// Product name used when an item carries none
pub const UNKNOWN_PRODUCT: &str = "Unknown";

/// Status key used when an order carries none
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Order {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub subtotal: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub tax: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub shipping: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    #[serde(default, deserialize_with = "lenient_text")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub quantity: f64,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.status.as_deref() == Some(PAID_STATUS)
    }

    /// Status key for distribution counts (`"UNKNOWN"` when absent)
    pub fn status_key(&self) -> &str {
        self.status.as_deref().unwrap_or(UNKNOWN_STATUS)
    }

    /// Calendar day of `created_at` in `tz`, or None when unparseable
    pub fn day_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        self.created_at.as_deref().and_then(|raw| parse_day(raw, tz))
    }
}

impl OrderItem {
    pub fn product_key(&self) -> &str {
        self.product_name.as_deref().unwrap_or(UNKNOWN_PRODUCT)
    }
}

/// Formats with an explicit offset, converted into the caller's zone
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Formats without an offset, read as local wall-clock time
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Bare date formats
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a timestamp string down to its calendar day in `tz`.
///
/// Instants with an offset (RFC 3339, RFC 2822, SQL-style `+00`) and
/// integer epoch milliseconds are converted into `tz` first. Offset-less
/// date-times and bare dates are already wall-clock values, so their date
/// is taken as-is.
pub fn parse_day<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.trim_start_matches('-').bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(millis) = raw.parse::<i64>() {
            return DateTime::from_timestamp_millis(millis)
                .map(|dt| dt.with_timezone(tz).date_naive());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(tz).date_naive());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_timezone(tz).date_naive());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Coerce any JSON value to an amount: numbers and numeric strings pass,
/// everything else (absent, null, bool, garbage, NaN/inf) is 0.
pub fn coerce_amount(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(0.0)
            }
        }
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Coerce a JSON scalar to text; null and containers are absent
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_amount).unwrap_or(0.0))
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_text))
}

fn lenient_items<'de, D>(deserializer: D) -> std::result::Result<Vec<OrderItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use serde_json::json;

    fn decode(value: Value) -> Order {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_full_order() {
        let order = decode(json!({
            "id": "3f2a9c1e-aaaa-bbbb",
            "customer_name": "Ada",
            "status": "PAID",
            "total": 24.5,
            "subtotal": 20,
            "tax": 2.5,
            "shipping": 2,
            "created_at": "2024-03-05T10:00:00Z",
            "items": [{"product_name": "Candle A", "quantity": 2}]
        }));

        assert_eq!(order.id.as_deref(), Some("3f2a9c1e-aaaa-bbbb"));
        assert!(order.is_paid());
        assert!((order.total - 24.5).abs() < f64::EPSILON);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product_key(), "Candle A");
    }

    #[test]
    fn test_missing_amounts_are_zero() {
        let order = decode(json!({"status": "PAID"}));
        assert_eq!(order.total, 0.0);
        assert_eq!(order.subtotal, 0.0);
        assert_eq!(order.tax, 0.0);
        assert_eq!(order.shipping, 0.0);
        assert!(order.items.is_empty());
    }

    #[test]
    fn test_invalid_amounts_are_zero() {
        let order = decode(json!({
            "total": "not a number",
            "subtotal": null,
            "tax": true,
            "shipping": {"amount": 3}
        }));
        assert_eq!(order.total, 0.0);
        assert_eq!(order.subtotal, 0.0);
        assert_eq!(order.tax, 0.0);
        assert_eq!(order.shipping, 0.0);
    }

    #[test]
    fn test_numeric_strings_are_parsed() {
        let order = decode(json!({"total": " 12.50 ", "tax": "1"}));
        assert!((order.total - 12.5).abs() < f64::EPSILON);
        assert!((order.tax - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_finite_strings_are_zero() {
        assert_eq!(coerce_amount(&json!("NaN")), 0.0);
        assert_eq!(coerce_amount(&json!("inf")), 0.0);
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let order = decode(json!({"id": 1042, "status": 7}));
        assert_eq!(order.id.as_deref(), Some("1042"));
        assert_eq!(order.status.as_deref(), Some("7"));
    }

    #[test]
    fn test_null_items_and_bad_entries() {
        let order = decode(json!({"items": null}));
        assert!(order.items.is_empty());

        let order = decode(json!({"items": [1, "x", {"quantity": "3"}, null]}));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product_key(), UNKNOWN_PRODUCT);
        assert!((order.items[0].quantity - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_status_key_defaults() {
        assert_eq!(Order::default().status_key(), UNKNOWN_STATUS);
        let order = decode(json!({"status": ""}));
        assert_eq!(order.status_key(), "");
        assert!(!order.is_paid());
    }

    #[test]
    fn test_paid_is_case_sensitive() {
        let order = decode(json!({"status": "paid"}));
        assert!(!order.is_paid());
    }

    #[test]
    fn test_parse_day_rfc3339_converts_zone() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let day = parse_day("2024-01-02T03:00:00Z", &tz).unwrap();
        assert_eq!(day, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        let day = parse_day("2024-01-02T03:00:00Z", &Utc).unwrap();
        assert_eq!(day, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_parse_day_sql_offset() {
        let day = parse_day("2024-06-30 23:30:00.123+00", &Utc).unwrap();
        assert_eq!(day, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    }

    #[test]
    fn test_parse_day_naive_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(parse_day("2024-01-01", &Utc), Some(expected));
        assert_eq!(parse_day("2024-01-01T23:59:59", &Utc), Some(expected));
        assert_eq!(parse_day("2024-01-01 08:15", &Utc), Some(expected));
    }

    #[test]
    fn test_parse_day_invalid() {
        assert_eq!(parse_day("", &Utc), None);
        assert_eq!(parse_day("yesterday", &Utc), None);
        assert_eq!(parse_day("2024-13-45", &Utc), None);
        assert_eq!(parse_day("12abc", &Utc), None);
    }

    #[test]
    fn test_parse_day_slash_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(parse_day("2024/01/01", &Utc), Some(expected));
        assert_eq!(parse_day("2024/01/01 18:30:00", &Utc), Some(expected));
    }

    #[test]
    fn test_parse_day_epoch_millis() {
        // 2024-01-01T23:30:00Z
        let day = parse_day("1704151800000", &Utc).unwrap();
        assert_eq!(day, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        let tz = FixedOffset::east_opt(3600).unwrap();
        let day = parse_day("1704151800000", &tz).unwrap();
        assert_eq!(day, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_numeric_created_at_buckets_by_day() {
        let order = decode(json!({"status": "PAID", "created_at": 1704151800000_i64}));
        assert_eq!(
            order.day_in(&Utc),
            Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
    }
}
