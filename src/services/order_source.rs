//! Order sources: the live backend or a saved JSON snapshot

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::services::OrdersApi;
use crate::types::{Order, OrderdashError, Result};

/// Something that can produce the current order list
pub trait OrderSource: Send + Sync {
    /// Human-readable origin (URL or file path)
    fn name(&self) -> String;

    /// Fetch a full snapshot of orders
    fn fetch(&self) -> Result<Vec<Order>>;
}

impl OrderSource for OrdersApi {
    fn name(&self) -> String {
        self.base_url().to_string()
    }

    fn fetch(&self) -> Result<Vec<Order>> {
        self.fetch_orders()
    }
}

/// Orders read from a JSON file previously saved from `/admin/orders`
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OrderSource for SnapshotFile {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<Order>> {
        let mut bytes = fs::read(&self.path)?;
        let value: Value = simd_json::serde::from_slice(&mut bytes).map_err(|e| {
            OrderdashError::Decode(format!("{}: {}", self.path.display(), e))
        })?;
        let orders = decode_orders(value)?;
        debug!(path = %self.path.display(), count = orders.len(), "loaded order snapshot");
        Ok(orders)
    }
}

/// Decode an `/admin/orders` body. Non-object records are skipped.
pub fn decode_orders(value: Value) -> Result<Vec<Order>> {
    let records = match value {
        Value::Array(records) => records,
        other => {
            return Err(OrderdashError::Decode(format!(
                "expected a JSON array of orders, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut orders = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        if !record.is_object() {
            warn!(index, kind = json_kind(&record), "skipping non-object order record");
            continue;
        }
        match serde_json::from_value::<Order>(record) {
            Ok(order) => orders.push(order),
            Err(e) => warn!(index, error = %e, "skipping undecodable order record"),
        }
    }
    Ok(orders)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
