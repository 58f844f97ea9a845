//! Services for fetching, aggregating and printing

pub mod aggregator;
pub mod api;
pub mod config;
pub mod labels;
pub mod logging;
pub mod order_source;

pub use aggregator::OrderAggregator;
pub use api::OrdersApi;
pub use config::{Config, ConfigOverrides};
pub use labels::{LabelBackend, LabelSelection, LabelService};
pub use order_source::{decode_orders, OrderSource, SnapshotFile};
