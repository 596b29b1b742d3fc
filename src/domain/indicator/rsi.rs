//! RSI (Relative Strength Index) indicator.
//!
//! Wilder's smoothing for average gain/loss:
//! - First averages: simple mean of the first n gains/losses
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! RSI = 100 - 100/(1 + avg_gain/avg_loss), with avg_loss == 0 pinned to 100
//! (covers both all-gain and flat series; never divides by zero).
//!
//! Warmup: the first n bars are invalid (n price changes are needed for the
//! initial averages).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price::PriceBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Rsi(period);

    if period == 0 || bars.len() <= period {
        let values = bars
            .iter()
            .map(|b| IndicatorPoint::invalid(b.date, IndicatorValue::Simple(0.0)))
            .collect();
        return IndicatorSeries {
            indicator_type,
            values,
        };
    }

    let mut gains = Vec::with_capacity(bars.len() - 1);
    let mut losses = Vec::with_capacity(bars.len() - 1);
    for window in bars.windows(2) {
        let delta = window[1].close - window[0].close;
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    let mut values: Vec<IndicatorPoint> = bars[..period]
        .iter()
        .map(|b| IndicatorPoint::invalid(b.date, IndicatorValue::Simple(0.0)))
        .collect();

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;
    values.push(valid_point(bars[period].date, avg_gain, avg_loss));

    for i in (period + 1)..bars.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i - 1]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i - 1]) / period as f64;
        values.push(valid_point(bars[i].date, avg_gain, avg_loss));
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}

fn valid_point(date: chrono::NaiveDate, avg_gain: f64, avg_loss: f64) -> IndicatorPoint {
    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    };
    IndicatorPoint {
        date,
        valid: true,
        value: IndicatorValue::Simple(rsi),
    }
}
