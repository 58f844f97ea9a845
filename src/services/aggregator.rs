//! Aggregator service for computing dashboard views from orders

use chrono::{Local, TimeZone};

use crate::types::{
    DailyRevenue, DayKey, Dashboard, Order, ProductUnits, RevenueBreakdown, StatusCounts, Summary,
};

/// Aggregator for computing dashboard views.
///
/// Every function is pure: no state survives between calls and no input
/// shape makes it fail.
pub struct OrderAggregator;

impl OrderAggregator {
    /// Order count, paid count and paid revenue
    pub fn summarize(orders: &[Order]) -> Summary {
        let mut summary = Summary {
            order_count: orders.len(),
            ..Summary::default()
        };

        for order in orders.iter().filter(|o| o.is_paid()) {
            summary.paid_count += 1;
            summary.total_revenue += order.total;
        }

        summary
    }

    /// Paid revenue per local calendar day (first-seen order)
    pub fn daily_revenue(orders: &[Order]) -> DailyRevenue {
        Self::daily_revenue_in(orders, &Local)
    }

    /// Paid revenue per calendar day in `tz` (first-seen order)
    pub fn daily_revenue_in<Tz: TimeZone>(orders: &[Order], tz: &Tz) -> DailyRevenue {
        let mut daily = DailyRevenue::new();

        for order in orders.iter().filter(|o| o.is_paid()) {
            let key = order.day_in(tz).map(DayKey::Day).unwrap_or(DayKey::Invalid);
            daily.add(key, order.total);
        }

        daily
    }

    /// Units sold per product across all orders (first-seen order)
    pub fn product_units(orders: &[Order]) -> ProductUnits {
        let mut products = ProductUnits::new();

        for item in orders.iter().flat_map(|o| o.items.iter()) {
            products.add(item.product_key().to_string(), item.quantity);
        }

        products
    }

    /// Order count per raw status, `UNKNOWN` when absent (first-seen order)
    pub fn status_counts(orders: &[Order]) -> StatusCounts {
        let mut counts = StatusCounts::new();

        for order in orders {
            counts.add(order.status_key().to_string(), 1);
        }

        counts
    }

    /// Subtotal, tax and shipping summed over paid orders
    pub fn revenue_breakdown(orders: &[Order]) -> RevenueBreakdown {
        orders
            .iter()
            .filter(|o| o.is_paid())
            .fold(RevenueBreakdown::default(), |mut acc, o| {
                acc.subtotal += o.subtotal;
                acc.tax += o.tax;
                acc.shipping += o.shipping;
                acc
            })
    }

    /// Rebuild every view from scratch
    pub fn dashboard(orders: &[Order]) -> Dashboard {
        Self::dashboard_in(orders, &Local)
    }

    pub fn dashboard_in<Tz: TimeZone>(orders: &[Order], tz: &Tz) -> Dashboard {
        Dashboard {
            summary: Self::summarize(orders),
            daily_revenue: Self::daily_revenue_in(orders, tz),
            product_units: Self::product_units(orders),
            status_counts: Self::status_counts(orders),
            revenue_breakdown: Self::revenue_breakdown(orders),
        }
    }
}
