//! Plain-text rendering of dashboard views for the CLI

use std::fmt::Write as _;

use crate::types::{
    DailyRevenue, Dashboard, Order, ProductUnits, RevenueBreakdown, StatusCounts, Summary,
};

/// Width of the label column in key/value listings
const LABEL_WIDTH: usize = 24;

/// Placeholder for absent customer/status cells
pub const EMPTY_CELL: &str = "—";

/// Format a number with thousand separators (e.g., 1234567 -> "1,234,567")
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    // Digits are ASCII, so byte indexing is safe
    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

/// Pounds with two decimals and grouped thousands (e.g., "£1,234.50")
pub fn format_money(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    format!("{}£{}.{:02}", sign, format_number(cents / 100), cents % 100)
}

/// Whole quantities without decimals, fractional ones with two
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 && quantity.abs() < u64::MAX as f64 {
        if quantity < 0.0 {
            format!("-{}", format_number(quantity.abs() as u64))
        } else {
            format_number(quantity as u64)
        }
    } else {
        format!("{:.2}", quantity)
    }
}

/// One row of the orders table, display-ready
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    pub id: String,
    pub short_id: String,
    pub customer: String,
    pub status: String,
    pub total: String,
}

impl OrderRow {
    pub fn from_order(order: &Order) -> Self {
        let id = order.id.clone().unwrap_or_default();
        let short_id = format!("{}...", id.chars().take(8).collect::<String>());
        Self {
            short_id,
            id,
            customer: order
                .customer_name
                .clone()
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
            status: order
                .status
                .clone()
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
            total: format_money(order.total),
        }
    }
}

pub fn summary(summary: &Summary) -> String {
    let mut out = String::new();
    let rows = [
        ("Orders", format_number(summary.order_count as u64)),
        ("Paid", format_number(summary.paid_count as u64)),
        ("Revenue", format!("£{}", summary.revenue_display())),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{:<width$}{}", label, value, width = LABEL_WIDTH);
    }
    out
}

pub fn daily_revenue(daily: &DailyRevenue) -> String {
    let rows = daily
        .iter()
        .map(|(day, revenue)| (day.to_string(), format_money(*revenue)));
    listing("Revenue (£) by day", rows)
}

pub fn product_units(products: &ProductUnits) -> String {
    let rows = products
        .iter()
        .map(|(name, units)| (name.clone(), format_quantity(*units)));
    listing("Units Sold", rows)
}

pub fn status_counts(counts: &StatusCounts) -> String {
    let rows = counts
        .iter()
        .map(|(status, count)| (status.clone(), format_number(*count)));
    listing("Order Status", rows)
}

pub fn revenue_breakdown(breakdown: &RevenueBreakdown) -> String {
    let rows = breakdown
        .parts()
        .into_iter()
        .map(|(label, amount)| (label.to_string(), format_money(amount)));
    listing("Revenue Breakdown", rows)
}

pub fn dashboard(dashboard: &Dashboard) -> String {
    [
        summary(&dashboard.summary),
        daily_revenue(&dashboard.daily_revenue),
        product_units(&dashboard.product_units),
        status_counts(&dashboard.status_counts),
        revenue_breakdown(&dashboard.revenue_breakdown),
    ]
    .join("\n")
}

pub fn orders_table(orders: &[Order]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:<24} {:<12} {:>12}",
        "Order", "Customer", "Status", "Total"
    );
    for row in orders.iter().map(OrderRow::from_order) {
        let _ = writeln!(
            out,
            "{:<12} {:<24} {:<12} {:>12}",
            row.short_id,
            truncate(&row.customer, 24),
            truncate(&row.status, 12),
            row.total
        );
    }
    out
}

fn listing(title: &str, rows: impl Iterator<Item = (String, String)>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    let mut empty = true;
    for (label, value) in rows {
        empty = false;
        let label = truncate(&label, LABEL_WIDTH - 1);
        let _ = writeln!(out, "  {:<width$}{:>14}", label, value, width = LABEL_WIDTH);
    }
    if empty {
        let _ = writeln!(out, "  (no data)");
    }
    out
}

/// Cut to `max` chars, marking the cut with an ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}…", s.chars().take(max.saturating_sub(1)).collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::OrderAggregator;
    use serde_json::json;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "£0.00");
        assert_eq!(format_money(10.5), "£10.50");
        assert_eq!(format_money(1234.567), "£1,234.57");
        assert_eq!(format_money(-3.2), "-£3.20");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(5.0), "5");
        assert_eq!(format_quantity(1500.0), "1,500");
        assert_eq!(format_quantity(2.5), "2.50");
    }

    #[test]
    fn test_order_row_defaults() {
        let order: Order = serde_json::from_value(json!({"id": "3f2a9c1e-5555-6666"})).unwrap();
        let row = OrderRow::from_order(&order);
        assert_eq!(row.short_id, "3f2a9c1e...");
        assert_eq!(row.customer, EMPTY_CELL);
        assert_eq!(row.status, EMPTY_CELL);
        assert_eq!(row.total, "£0.00");
    }

    #[test]
    fn test_summary_text() {
        let text = summary(&Summary {
            order_count: 2,
            paid_count: 1,
            total_revenue: 10.0,
        });
        assert!(text.contains("Orders"));
        assert!(text.contains("£10.00"));
    }

    #[test]
    fn test_listing_empty() {
        let text = product_units(&ProductUnits::new());
        assert!(text.contains("(no data)"));
    }

    #[test]
    fn test_dashboard_text_preserves_first_seen_order() {
        let orders: Vec<Order> = serde_json::from_value(json!([
            {"status": "SHIPPED"},
            {"status": "PAID", "total": 4, "created_at": "2024-01-02"},
            {"status": "PAID", "total": 6, "created_at": "2024-01-01"}
        ]))
        .unwrap();
        let text = dashboard(&OrderAggregator::dashboard(&orders));

        let shipped = text.find("SHIPPED").unwrap();
        let paid = text.find("PAID").unwrap();
        assert!(shipped < paid);

        let second = text.find("2024-01-02").unwrap();
        let first = text.find("2024-01-01").unwrap();
        assert!(second < first);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
