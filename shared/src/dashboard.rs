//! Owner dashboard aggregation
//!
//! The database layer fetches raw rows; everything here is pure so the
//! numbers can be checked without a database.

use crate::order::OrderStatus;
use crate::util::{millis_to_utc, start_of_day_millis};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const DAY_MS: i64 = 86_400_000;
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Days shown on the revenue chart, today included
pub const CHART_DAYS: usize = 7;
pub const TOP_SELLERS: usize = 3;
pub const RECENT_ACTIVITY: usize = 5;

/// Order row used for revenue figures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RevenueRow {
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub created_at: i64,
}

/// One order line with the name of its menu item (if it still exists)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SoldLine {
    pub name: Option<String>,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RecentOrderRow {
    pub customer_name: Option<String>,
    pub table_number: Option<String>,
    pub status: OrderStatus,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Weekday label, `Sun`..`Sat`
    pub name: String,
    /// `YYYY-MM-DD` (UTC)
    pub date: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSeller {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub title: String,
    pub subtitle: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub active_orders: i64,
    pub active_tables: i64,
    pub total_orders_today: i64,
    pub chart_data: Vec<ChartPoint>,
    pub top_selling: Vec<TopSeller>,
    pub recent_activity: Vec<Activity>,
}

/// First millisecond of the chart window (start of the day six days ago)
pub fn chart_window_start(now: i64) -> i64 {
    start_of_day_millis(now) - (CHART_DAYS as i64 - 1) * DAY_MS
}

/// Sum of paid order totals created in `[from, to)`
pub fn sum_revenue(rows: &[RevenueRow], from: i64, to: i64) -> Decimal {
    rows.iter()
        .filter(|r| r.status == OrderStatus::Paid && r.created_at >= from && r.created_at < to)
        .map(|r| r.total_amount)
        .sum()
}

/// Paid revenue per day for today and the six days before, oldest first.
///
/// Always returns exactly seven buckets; days without sales are zero.
pub fn weekly_chart(rows: &[RevenueRow], now: i64) -> Vec<ChartPoint> {
    let first_day = chart_window_start(now);
    let mut totals = [Decimal::ZERO; CHART_DAYS];

    for row in rows.iter().filter(|r| r.status == OrderStatus::Paid) {
        let offset = (start_of_day_millis(row.created_at) - first_day).div_euclid(DAY_MS);
        if let Ok(idx) = usize::try_from(offset)
            && let Some(slot) = totals.get_mut(idx)
        {
            *slot += row.total_amount;
        }
    }

    totals
        .iter()
        .enumerate()
        .map(|(i, total)| {
            let day = millis_to_utc(first_day + i as i64 * DAY_MS).date_naive();
            ChartPoint {
                name: WEEKDAYS[day.weekday().num_days_from_sunday() as usize].to_string(),
                date: day.format("%Y-%m-%d").to_string(),
                total: *total,
            }
        })
        .collect()
}

/// Best sellers by quantity, ties broken by name
pub fn top_selling(lines: &[SoldLine], limit: usize) -> Vec<TopSeller> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for line in lines {
        let name = line
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown");
        *counts.entry(name).or_default() += i64::from(line.quantity);
    }

    let mut sellers: Vec<TopSeller> = counts
        .into_iter()
        .map(|(name, count)| TopSeller {
            name: name.to_string(),
            count,
        })
        .collect();
    sellers.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    sellers.truncate(limit);
    sellers
}

/// Activity feed entries, in the order given (newest first from the query)
pub fn recent_activity(orders: &[RecentOrderRow]) -> Vec<Activity> {
    orders
        .iter()
        .map(|o| {
            let customer = o
                .customer_name
                .as_deref()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or("Guest");
            let table = o
                .table_number
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or("Express");
            Activity {
                title: format!("New order from {customer}"),
                subtitle: format!("Table {table} • {}", o.status),
                time: millis_to_utc(o.created_at).format("%H:%M").to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-03-14 (Friday) 15:09:26 UTC
    const NOW: i64 = 1_741_964_966_535;
    const TODAY: i64 = 1_741_910_400_000;

    fn row(status: OrderStatus, cents: i64, created_at: i64) -> RevenueRow {
        RevenueRow {
            status,
            total_amount: Decimal::new(cents, 2),
            created_at,
        }
    }

    #[test]
    fn test_sum_revenue_only_paid_in_window() {
        let rows = vec![
            row(OrderStatus::Paid, 1000, TODAY + 1),
            row(OrderStatus::Paid, 550, NOW),
            row(OrderStatus::Served, 9999, TODAY + 2),
            row(OrderStatus::Cancelled, 9999, TODAY + 3),
            row(OrderStatus::Paid, 700, TODAY - 1),
        ];
        assert_eq!(sum_revenue(&rows, TODAY, NOW + 1), Decimal::new(1550, 2));
        assert_eq!(sum_revenue(&rows, TODAY - DAY_MS, TODAY), Decimal::new(700, 2));
        assert_eq!(sum_revenue(&[], TODAY, NOW), Decimal::ZERO);
    }

    #[test]
    fn test_weekly_chart_always_seven_zero_filled() {
        let chart = weekly_chart(&[], NOW);
        assert_eq!(chart.len(), CHART_DAYS);
        assert!(chart.iter().all(|p| p.total == Decimal::ZERO));
        let names: Vec<_> = chart.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"]);
        assert_eq!(chart[0].date, "2025-03-08");
        assert_eq!(chart[6].date, "2025-03-14");
    }

    #[test]
    fn test_weekly_chart_buckets_by_day() {
        let rows = vec![
            row(OrderStatus::Paid, 1000, NOW),
            row(OrderStatus::Paid, 500, TODAY),
            row(OrderStatus::Paid, 200, TODAY - 6 * DAY_MS),
            // outside the window
            row(OrderStatus::Paid, 300, TODAY - 7 * DAY_MS),
            // not paid
            row(OrderStatus::Ready, 400, NOW),
        ];
        let chart = weekly_chart(&rows, NOW);
        assert_eq!(chart.len(), 7);
        assert_eq!(chart[6].total, Decimal::new(1500, 2));
        assert_eq!(chart[0].total, Decimal::new(200, 2));
        let sum: Decimal = chart.iter().map(|p| p.total).sum();
        assert_eq!(sum, Decimal::new(1700, 2));
    }

    #[test]
    fn test_top_selling() {
        let sold = |name: Option<&str>, quantity| SoldLine {
            name: name.map(str::to_string),
            quantity,
        };
        let lines = vec![
            sold(Some("Pizza"), 2),
            sold(Some("Cola"), 5),
            sold(None, 1),
            sold(Some("Pizza"), 4),
            sold(Some("Salad"), 1),
        ];
        let top: Vec<(String, i64)> = top_selling(&lines, TOP_SELLERS)
            .into_iter()
            .map(|t| (t.name, t.count))
            .collect();
        assert_eq!(
            top,
            vec![
                ("Pizza".to_string(), 6),
                ("Cola".to_string(), 5),
                ("Salad".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_recent_activity_format() {
        let orders = vec![
            RecentOrderRow {
                customer_name: Some("Ana".into()),
                table_number: Some("4".into()),
                status: OrderStatus::Preparing,
                created_at: NOW,
            },
            RecentOrderRow {
                customer_name: None,
                table_number: None,
                status: OrderStatus::Pending,
                created_at: TODAY,
            },
        ];
        let feed = recent_activity(&orders);
        assert_eq!(feed[0].title, "New order from Ana");
        assert_eq!(feed[0].subtitle, "Table 4 • preparing");
        assert_eq!(feed[0].time, "15:09");
        assert_eq!(feed[1].title, "New order from Guest");
        assert_eq!(feed[1].subtitle, "Table Express • pending");
        assert_eq!(feed[1].time, "00:00");
    }
}
