//! Chart models and the registry that owns the dashboard's live charts
//!
//! Every rebuild installs a fresh chart per slot and hands the previous
//! one back to the caller, so at most one chart is ever live per slot.

use tracing::debug;

use crate::types::Dashboard;

/// Dashboard position of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSlot {
    SalesTrend,
    TopProducts,
    OrderStatus,
    RevenueBreakdown,
}

impl ChartSlot {
    pub fn all() -> &'static [ChartSlot] {
        &[
            ChartSlot::SalesTrend,
            ChartSlot::TopProducts,
            ChartSlot::OrderStatus,
            ChartSlot::RevenueBreakdown,
        ]
    }

    fn index(self) -> usize {
        match self {
            Self::SalesTrend => 0,
            Self::TopProducts => 1,
            Self::OrderStatus => 2,
            Self::RevenueBreakdown => 3,
        }
    }
}

/// How a chart is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Vertical columns along a time axis
    Line,
    /// Horizontal bars, one per label
    Bar,
    /// Share of the whole, one colored slice per label
    Doughnut,
    /// Share of the whole with fixed slices
    Pie,
}

/// Everything needed to draw one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub kind: ChartKind,
    pub title: String,
    /// Series name shown next to the title
    pub series: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartModel {
    pub fn sales_trend(dashboard: &Dashboard) -> Self {
        let (labels, values) = dashboard
            .daily_revenue
            .iter()
            .map(|(day, revenue)| (day.to_string(), *revenue))
            .unzip();
        Self {
            kind: ChartKind::Line,
            title: "Sales Trend".to_string(),
            series: "Revenue (£)".to_string(),
            labels,
            values,
        }
    }

    pub fn top_products(dashboard: &Dashboard) -> Self {
        let (labels, values) = dashboard
            .product_units
            .iter()
            .map(|(name, units)| (name.clone(), *units))
            .unzip();
        Self {
            kind: ChartKind::Bar,
            title: "Top Products".to_string(),
            series: "Units Sold".to_string(),
            labels,
            values,
        }
    }

    pub fn order_status(dashboard: &Dashboard) -> Self {
        let (labels, values) = dashboard
            .status_counts
            .iter()
            .map(|(status, count)| (status.clone(), *count as f64))
            .unzip();
        Self {
            kind: ChartKind::Doughnut,
            title: "Order Status".to_string(),
            series: "Orders".to_string(),
            labels,
            values,
        }
    }

    pub fn revenue_breakdown(dashboard: &Dashboard) -> Self {
        let (labels, values) = dashboard
            .revenue_breakdown
            .parts()
            .into_iter()
            .map(|(label, amount)| (label.to_string(), amount))
            .unzip();
        Self {
            kind: ChartKind::Pie,
            title: "Revenue Breakdown".to_string(),
            series: "£".to_string(),
            labels,
            values,
        }
    }

    /// Build the chart that belongs in `slot`
    pub fn for_slot(slot: ChartSlot, dashboard: &Dashboard) -> Self {
        match slot {
            ChartSlot::SalesTrend => Self::sales_trend(dashboard),
            ChartSlot::TopProducts => Self::top_products(dashboard),
            ChartSlot::OrderStatus => Self::order_status(dashboard),
            ChartSlot::RevenueBreakdown => Self::revenue_breakdown(dashboard),
        }
    }

    /// Largest value, 0 for an empty chart
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Sum of all values
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Label/value pairs in display order
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// The live chart for each dashboard slot
#[derive(Debug, Default)]
pub struct ChartRegistry {
    slots: [Option<ChartModel>; 4],
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: ChartSlot) -> Option<&ChartModel> {
        self.slots[slot.index()].as_ref()
    }

    /// Install `chart` in `slot`, returning the chart it replaces
    pub fn replace(&mut self, slot: ChartSlot, chart: ChartModel) -> Option<ChartModel> {
        self.slots[slot.index()].replace(chart)
    }

    /// Replace every chart from `dashboard`, returning how many old charts
    /// were disposed
    pub fn rebuild(&mut self, dashboard: &Dashboard) -> usize {
        let disposed = ChartSlot::all()
            .iter()
            .filter_map(|&slot| self.replace(slot, ChartModel::for_slot(slot, dashboard)))
            .count();
        debug!(disposed, "charts rebuilt");
        disposed
    }

    /// Number of slots holding a chart
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::OrderAggregator;
    use crate::types::Order;
    use chrono::Utc;
    use serde_json::json;

    fn dashboard() -> Dashboard {
        let orders: Vec<Order> = serde_json::from_value(json!([
            {"status": "PAID", "total": 10, "subtotal": 8, "tax": 1, "shipping": 1,
             "created_at": "2024-01-01",
             "items": [{"product_name": "Candle A", "quantity": 3}]},
            {"status": "PENDING", "total": 5},
            {"status": "PAID", "total": 15, "created_at": "2024-01-01",
             "items": [{"product_name": "Candle A", "quantity": 2}]}
        ]))
        .unwrap();
        OrderAggregator::dashboard_in(&orders, &Utc)
    }

    // ========== ChartModel tests ==========

    #[test]
    fn test_sales_trend_model() {
        let chart = ChartModel::sales_trend(&dashboard());
        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!(chart.series, "Revenue (£)");
        assert_eq!(chart.labels, ["2024-01-01"]);
        assert_eq!(chart.values, [25.0]);
    }

    #[test]
    fn test_top_products_model() {
        let chart = ChartModel::top_products(&dashboard());
        assert_eq!(chart.series, "Units Sold");
        assert_eq!(chart.points().collect::<Vec<_>>(), [("Candle A", 5.0)]);
    }

    #[test]
    fn test_order_status_model_keeps_first_seen_order() {
        let chart = ChartModel::order_status(&dashboard());
        assert_eq!(chart.labels, ["PAID", "PENDING"]);
        assert_eq!(chart.values, [2.0, 1.0]);
        assert_eq!(chart.total(), 3.0);
    }

    #[test]
    fn test_revenue_breakdown_model() {
        let chart = ChartModel::revenue_breakdown(&dashboard());
        assert_eq!(chart.labels, ["Product", "Tax", "Shipping"]);
        assert_eq!(chart.values, [8.0, 1.0, 1.0]);
    }

    #[test]
    fn test_max_value_empty_chart() {
        let chart = ChartModel::top_products(&Dashboard::default());
        assert!(chart.is_empty());
        assert_eq!(chart.max_value(), 0.0);
    }

    // ========== ChartRegistry tests ==========

    #[test]
    fn test_replace_returns_previous_chart() {
        let mut registry = ChartRegistry::new();
        let first = ChartModel::sales_trend(&Dashboard::default());
        let second = ChartModel::sales_trend(&dashboard());

        assert!(registry
            .replace(ChartSlot::SalesTrend, first.clone())
            .is_none());
        let disposed = registry.replace(ChartSlot::SalesTrend, second.clone());

        assert_eq!(disposed, Some(first));
        assert_eq!(registry.get(ChartSlot::SalesTrend), Some(&second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_rebuild_fills_every_slot() {
        let mut registry = ChartRegistry::new();
        assert!(registry.is_empty());

        assert_eq!(registry.rebuild(&dashboard()), 0);
        assert_eq!(registry.len(), 4);
        for slot in ChartSlot::all() {
            assert!(registry.get(*slot).is_some());
        }
    }

    #[test]
    fn test_rebuild_disposes_previous_charts() {
        let mut registry = ChartRegistry::new();
        registry.rebuild(&Dashboard::default());

        assert_eq!(registry.rebuild(&dashboard()), 4);
        assert_eq!(registry.len(), 4);
        let trend = registry.get(ChartSlot::SalesTrend).unwrap();
        assert_eq!(trend.values, [25.0]);
    }
}
