pub mod report;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::services::{
    config, logging, Config, ConfigOverrides, LabelSelection, LabelService, OrderAggregator,
    OrderSource, OrdersApi, SnapshotFile,
};
use crate::tui::{self, Section};
use crate::types::Order;

/// Shown when the order list cannot be loaded
pub const LOAD_FAILED: &str = "Could not load dashboard data. Please try again.";

/// Terminal dashboard for orders, sales charts and shipping labels
#[derive(Parser)]
#[command(name = "orderdash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Default)]
struct GlobalArgs {
    /// Backend base URL
    #[arg(long, global = true, value_name = "URL")]
    api_base: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Directory for downloaded label PDFs
    #[arg(long, global = true, value_name = "DIR")]
    label_dir: Option<PathBuf>,

    /// Config file (default: ~/.orderdash/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read orders from a saved JSON snapshot instead of the backend
    #[arg(long, global = true, value_name = "ORDERS_JSON")]
    file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch interactive TUI (default)
    Tui {
        /// Section to open first: dashboard, orders or shipping
        #[arg(long, value_name = "NAME")]
        section: Option<String>,
    },

    /// Show order KPIs
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show paid revenue per day
    Daily {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show units sold per product
    Products {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show order count per status
    Statuses {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show subtotal/tax/shipping of paid orders
    Breakdown {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show every dashboard view
    Report {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List orders
    Orders {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download the shipping label for one order
    Label {
        /// Order id
        id: String,
    },

    /// Download one label document for several orders
    Labels {
        /// Order ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let is_tui = matches!(self.command, None | Some(Commands::Tui { .. }));
        if is_tui {
            if let Some(warning) = init_tui_logging(config::app_dir()) {
                eprintln!("[orderdash] Warning: {}", warning);
            }
        } else {
            logging::init_stderr();
        }

        let config = Config::load(&self.global.overrides())?;
        let api = Arc::new(OrdersApi::new(&config)?);
        let source: Arc<dyn OrderSource> = match &self.global.file {
            Some(path) => Arc::new(SnapshotFile::new(path)) as Arc<dyn OrderSource>,
            None => api.clone() as Arc<dyn OrderSource>,
        };

        match self.command {
            None => tui::run(source, api, config.label_dir, Section::default()),
            Some(Commands::Tui { section }) => {
                let section = section
                    .as_deref()
                    .map(Section::from_nav_label)
                    .unwrap_or_default();
                tui::run(source, api, config.label_dir, section)
            }
            Some(Commands::Summary { json }) => {
                let orders = load_orders(source.as_ref())?;
                let summary = OrderAggregator::summarize(&orders);
                emit(json, &summary, || report::summary(&summary))
            }
            Some(Commands::Daily { json }) => {
                let orders = load_orders(source.as_ref())?;
                let daily = OrderAggregator::daily_revenue(&orders);
                emit(json, &daily, || report::daily_revenue(&daily))
            }
            Some(Commands::Products { json }) => {
                let orders = load_orders(source.as_ref())?;
                let products = OrderAggregator::product_units(&orders);
                emit(json, &products, || report::product_units(&products))
            }
            Some(Commands::Statuses { json }) => {
                let orders = load_orders(source.as_ref())?;
                let counts = OrderAggregator::status_counts(&orders);
                emit(json, &counts, || report::status_counts(&counts))
            }
            Some(Commands::Breakdown { json }) => {
                let orders = load_orders(source.as_ref())?;
                let breakdown = OrderAggregator::revenue_breakdown(&orders);
                emit(json, &breakdown, || report::revenue_breakdown(&breakdown))
            }
            Some(Commands::Report { json }) => {
                let orders = load_orders(source.as_ref())?;
                let dashboard = OrderAggregator::dashboard(&orders);
                emit(json, &dashboard, || report::dashboard(&dashboard))
            }
            Some(Commands::Orders { json }) => {
                let orders = load_orders(source.as_ref())?;
                emit(json, &orders, || report::orders_table(&orders))
            }
            Some(Commands::Label { id }) => {
                let labels = LabelService::new(api, &config.label_dir);
                let path = labels
                    .print_single(&id)
                    .context("Could not print label. Please try again.")?;
                println!("{}", path.display());
                Ok(())
            }
            Some(Commands::Labels { ids }) => {
                let mut selection = LabelSelection::new();
                for id in &ids {
                    selection.toggle(id, true);
                }
                let labels = LabelService::new(api, &config.label_dir);
                let path = labels
                    .print_batch(&selection)
                    .context("Could not generate batch labels. Please try again.")?;
                println!("{}", path.display());
                Ok(())
            }
        }
    }
}

impl GlobalArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            api_base: self.api_base.clone(),
            timeout_secs: self.timeout,
            label_dir: self.label_dir.clone(),
        }
    }
}

/// Start file logging under `<app dir>/logs`. Returns a warning when the
/// log file cannot be opened; the TUI still runs without it.
fn init_tui_logging(app_dir: crate::types::Result<PathBuf>) -> Option<String> {
    let result = app_dir.and_then(|dir| logging::init_file(&dir.join("logs")));
    result.err().map(|e| format!("file logging disabled ({})", e))
}

fn load_orders(source: &dyn OrderSource) -> anyhow::Result<Vec<Order>> {
    source
        .fetch()
        .with_context(|| format!("{} ({})", LOAD_FAILED, source.name()))
}

/// Print `value` as pretty JSON, or the text produced by `text`
fn emit<T, F>(json: bool, value: &T, text: F) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderdashError;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["orderdash"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_tui_section() {
        let cli = Cli::try_parse_from(["orderdash", "tui", "--section", "shipping"]).unwrap();
        match cli.command {
            Some(Commands::Tui { section }) => assert_eq!(section.as_deref(), Some("shipping")),
            _ => panic!("expected tui command"),
        }
    }

    #[test]
    fn test_cli_parse_summary_json() {
        let cli = Cli::try_parse_from(["orderdash", "summary", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Summary { json: true })));
    }

    #[test]
    fn test_cli_parse_daily() {
        let cli = Cli::try_parse_from(["orderdash", "daily"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Daily { json: false })));
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "orderdash",
            "report",
            "--file",
            "orders.json",
            "--api-base",
            "http://localhost:3000",
            "--timeout",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.global.file, Some(PathBuf::from("orders.json")));

        let overrides = cli.global.overrides();
        assert_eq!(overrides.api_base.as_deref(), Some("http://localhost:3000"));
        assert_eq!(overrides.timeout_secs, Some(4));
    }

    #[test]
    fn test_cli_parse_label() {
        let cli = Cli::try_parse_from(["orderdash", "label", "abc"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Label { ref id }) if id == "abc"));
    }

    #[test]
    fn test_cli_labels_requires_ids() {
        assert!(Cli::try_parse_from(["orderdash", "labels"]).is_err());

        let cli = Cli::try_parse_from(["orderdash", "labels", "a", "b"]).unwrap();
        match cli.command {
            Some(Commands::Labels { ids }) => assert_eq!(ids, ["a", "b"]),
            _ => panic!("expected labels command"),
        }
    }

    #[test]
    fn test_load_orders_error_mentions_retry() {
        let source = SnapshotFile::new("/nonexistent/orders.json");
        let err = load_orders(&source).unwrap_err();
        assert!(err.to_string().starts_with(LOAD_FAILED));
    }

    // ========== init_tui_logging() tests ==========

    #[test]
    fn test_init_tui_logging_warns_on_unwritable_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let blocker = tmp.path().join("app");
        std::fs::write(&blocker, "x").unwrap();

        let warning = init_tui_logging(Ok(blocker)).unwrap();
        assert!(warning.starts_with("file logging disabled"));
    }

    #[test]
    fn test_init_tui_logging_warns_without_app_dir() {
        let warning =
            init_tui_logging(Err(OrderdashError::Config("no home directory".into()))).unwrap();
        assert!(warning.contains("no home directory"));
    }
}
