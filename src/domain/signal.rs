//! Buy/sell signal derivation from RSI and MACD threshold rules.
//!
//! Pure per-date rule:
//! - Buy:  RSI below the buy threshold and MACD line above its signal line
//! - Sell: RSI above the sell threshold and MACD line below its signal line
//!
//! Dates where either indicator is still in its warm-up window produce no
//! signal at all.

use chrono::NaiveDate;

use crate::domain::indicator::IndicatorSeries;

pub const DEFAULT_RSI_BUY_BELOW: f64 = 30.0;
pub const DEFAULT_RSI_SELL_ABOVE: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalThresholds {
    pub rsi_buy_below: f64,
    pub rsi_sell_above: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            rsi_buy_below: DEFAULT_RSI_BUY_BELOW,
            rsi_sell_above: DEFAULT_RSI_SELL_ABOVE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub buy: bool,
    pub sell: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    pub thresholds: SignalThresholds,
    pub points: Vec<SignalPoint>,
}

impl SignalSeries {
    pub fn buy_count(&self) -> usize {
        self.points.iter().filter(|p| p.buy).count()
    }

    pub fn sell_count(&self) -> usize {
        self.points.iter().filter(|p| p.sell).count()
    }
}

/// Derive buy/sell flags for every date in the (aligned) indicator series.
pub fn generate_signals(
    rsi: &IndicatorSeries,
    macd: &IndicatorSeries,
    thresholds: SignalThresholds,
) -> SignalSeries {
    debug_assert_eq!(rsi.values.len(), macd.values.len());

    let points = rsi
        .values
        .iter()
        .zip(&macd.values)
        .map(|(rsi_point, macd_point)| {
            debug_assert_eq!(rsi_point.date, macd_point.date);

            let (buy, sell) = match (rsi_point.simple(), macd_point.macd()) {
                (Some(rsi), Some((line, signal, _))) => (
                    rsi < thresholds.rsi_buy_below && line > signal,
                    rsi > thresholds.rsi_sell_above && line < signal,
                ),
                _ => (false, false),
            };

            SignalPoint {
                date: rsi_point.date,
                buy,
                sell,
            }
        })
        .collect();

    SignalSeries { thresholds, points }
}
