//! Derived dashboard views computed from an order list

use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use std::ops::AddAssign;

/// Label for orders whose `created_at` could not be read as a date
pub const INVALID_DAY_LABEL: &str = "Invalid Date";

/// Headline KPIs
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct Summary {
    pub order_count: usize,
    pub paid_count: usize,
    /// Full-precision sum; use `revenue_display` for the 2-decimal form
    pub total_revenue: f64,
}

impl Summary {
    pub fn revenue_display(&self) -> String {
        format!("{:.2}", self.total_revenue)
    }
}

/// Subtotal/tax/shipping sums over paid orders
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct RevenueBreakdown {
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
}

impl RevenueBreakdown {
    /// Chart slices in display order
    pub fn parts(&self) -> [(&'static str, f64); 3] {
        [
            ("Product", self.subtotal),
            ("Tax", self.tax),
            ("Shipping", self.shipping),
        ]
    }
}

/// Day bucket for the sales trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayKey {
    Day(NaiveDate),
    /// Missing or unparseable `created_at`
    Invalid,
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Invalid => f.write_str(INVALID_DAY_LABEL),
        }
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Insertion-ordered association list of running totals.
///
/// Keys keep the order in which they were first added; re-adding a key
/// accumulates in place. Serializes as a JSON object in that same order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for Tally<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq, V: AddAssign + Copy> Tally<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate `amount` under `key`, appending the key if it is new
    pub fn add(&mut self, key: K, amount: V) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, total)) => *total += amount,
            None => self.entries.push((key, amount)),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: PartialEq<Q>,
        Q: ?Sized,
    {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }
}

impl<K, V> Tally<K, V> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K: Serialize, V: Serialize> Serialize for Tally<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Paid revenue per day, first-seen order
pub type DailyRevenue = Tally<DayKey, f64>;

/// Units sold per product, first-seen order
pub type ProductUnits = Tally<String, f64>;

/// Orders per status, first-seen order
pub type StatusCounts = Tally<String, u64>;

/// Every derived view from a single rebuild
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Dashboard {
    pub summary: Summary,
    pub daily_revenue: DailyRevenue,
    pub product_units: ProductUnits,
    pub status_counts: StatusCounts,
    pub revenue_breakdown: RevenueBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_keeps_first_seen_order() {
        let mut tally: Tally<String, u64> = Tally::new();
        tally.add("SHIPPED".into(), 1);
        tally.add("PAID".into(), 1);
        tally.add("SHIPPED".into(), 1);

        let keys: Vec<&String> = tally.keys().collect();
        assert_eq!(keys, ["SHIPPED", "PAID"]);
        assert_eq!(tally.get("SHIPPED"), Some(2));
        assert_eq!(tally.get("MISSING"), None);
    }

    #[test]
    fn test_tally_serializes_in_order() {
        let mut tally: Tally<String, u64> = Tally::new();
        tally.add("zeta".into(), 2);
        tally.add("alpha".into(), 1);

        let json = serde_json::to_string(&tally).unwrap();
        assert_eq!(json, r#"{"zeta":2,"alpha":1}"#);
    }

    #[test]
    fn test_day_key_display() {
        let day = DayKey::Day(NaiveDate::from_ymd_opt(2024, 2, 9).unwrap());
        assert_eq!(day.to_string(), "2024-02-09");
        assert_eq!(DayKey::Invalid.to_string(), INVALID_DAY_LABEL);
    }

    #[test]
    fn test_day_key_as_json_map_key() {
        let mut daily = DailyRevenue::new();
        daily.add(DayKey::Invalid, 3.0);
        let json = serde_json::to_string(&daily).unwrap();
        assert_eq!(json, r#"{"Invalid Date":3.0}"#);
    }

    #[test]
    fn test_revenue_display_two_decimals() {
        let summary = Summary {
            order_count: 3,
            paid_count: 2,
            total_revenue: 10.0 / 3.0,
        };
        assert_eq!(summary.revenue_display(), "3.33");
    }

    #[test]
    fn test_breakdown_parts_order() {
        let breakdown = RevenueBreakdown {
            subtotal: 20.0,
            tax: 4.0,
            shipping: 3.5,
        };
        let labels: Vec<&str> = breakdown.parts().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, ["Product", "Tax", "Shipping"]);
    }
}
