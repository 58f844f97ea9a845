//! Shipping label selection and download

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::services::OrdersApi;
use crate::types::{OrderdashError, Result};

/// Characters of the order id kept in single-label file names
const SHORT_ID_LEN: usize = 8;

/// Order ids ticked for batch printing, in the order they were ticked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelection {
    ids: Vec<String>,
}

impl LabelSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the checked state of `id`
    pub fn toggle(&mut self, id: &str, checked: bool) {
        if checked {
            if !self.contains(id) {
                self.ids.push(id.to_string());
            }
        } else {
            self.ids.retain(|s| s != id);
        }
    }

    /// Invert the checked state of `id`, returning the new state
    pub fn flip(&mut self, id: &str) -> bool {
        let checked = !self.contains(id);
        self.toggle(id, checked);
        checked
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// Where label documents come from
pub trait LabelBackend {
    fn fetch_label(&self, order_id: &str) -> Result<Vec<u8>>;
    fn fetch_batch_labels(&self, order_ids: &[String]) -> Result<Vec<u8>>;
}

impl LabelBackend for OrdersApi {
    fn fetch_label(&self, order_id: &str) -> Result<Vec<u8>> {
        OrdersApi::fetch_label(self, order_id)
    }

    fn fetch_batch_labels(&self, order_ids: &[String]) -> Result<Vec<u8>> {
        OrdersApi::fetch_batch_labels(self, order_ids)
    }
}

impl<T: LabelBackend + ?Sized> LabelBackend for Arc<T> {
    fn fetch_label(&self, order_id: &str) -> Result<Vec<u8>> {
        (**self).fetch_label(order_id)
    }

    fn fetch_batch_labels(&self, order_ids: &[String]) -> Result<Vec<u8>> {
        (**self).fetch_batch_labels(order_ids)
    }
}

/// Downloads labels and writes them as PDF files into `out_dir`
pub struct LabelService<B> {
    backend: B,
    out_dir: PathBuf,
}

impl<B: LabelBackend> LabelService<B> {
    pub fn new(backend: B, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Download the label for one order, returning the written path
    pub fn print_single(&self, order_id: &str) -> Result<PathBuf> {
        let bytes = self.backend.fetch_label(order_id)?;
        let stem = format!("label-{}", short_id(order_id));
        self.write(&stem, &bytes)
    }

    /// Download one document for every selected order.
    /// An empty selection fails before any request is made.
    pub fn print_batch(&self, selection: &LabelSelection) -> Result<PathBuf> {
        if selection.is_empty() {
            return Err(OrderdashError::EmptySelection);
        }
        let bytes = self.backend.fetch_batch_labels(selection.ids())?;
        let stem = batch_file_stem(Local::now().naive_local());
        self.write(&stem, &bytes)
    }

    fn write(&self, stem: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;
        let path = unique_path(&self.out_dir, stem, "pdf");
        fs::write(&path, bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "label saved");
        Ok(path)
    }
}

/// First 8 characters of an id, made safe for a file name
pub fn short_id(order_id: &str) -> String {
    let short: String = order_id
        .chars()
        .take(SHORT_ID_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if short.is_empty() {
        "unnamed".to_string()
    } else {
        short
    }
}

pub fn batch_file_stem(now: NaiveDateTime) -> String {
    format!("labels-batch-{}", now.format("%Y%m%d-%H%M%S"))
}

/// `dir/stem.ext`, or `dir/stem-N.ext` if that name is taken
fn unique_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let first = dir.join(format!("{}.{}", stem, ext));
    if !first.exists() {
        return first;
    }
    (2..)
        .map(|n| dir.join(format!("{}-{}.{}", stem, n, ext)))
        .find(|p| !p.exists())
        .unwrap_or(first)
}
