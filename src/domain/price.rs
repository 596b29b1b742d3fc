//! Daily OHLCV bar representation and series normalization.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Sort ascending by date and collapse duplicate dates.
///
/// Providers occasionally restate a trading day; the record fetched last wins.
pub fn normalize(mut bars: Vec<PriceBar>) -> Vec<PriceBar> {
    bars.sort_by_key(|b| b.date);
    bars.dedup_by(|later, kept| {
        if later.date == kept.date {
            std::mem::swap(later, kept);
            true
        } else {
            false
        }
    });
    bars
}
