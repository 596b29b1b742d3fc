//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of the MACD line, seeded with the simple average
//! of its first `signal` defined values
//! Histogram = MACD Line - Signal Line
//!
//! Warmup: slow - 1 + signal - 1 bars.

use crate::domain::indicator::{
    calculate_ema, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::price::PriceBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    bars: &[PriceBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };

    if fast == 0 || slow == 0 || signal_period == 0 {
        let values = bars
            .iter()
            .map(|b| {
                IndicatorPoint::invalid(
                    b.date,
                    IndicatorValue::Macd {
                        line: 0.0,
                        signal: 0.0,
                        histogram: 0.0,
                    },
                )
            })
            .collect();
        return IndicatorSeries {
            indicator_type,
            values,
        };
    }

    let fast_ema = ema_closes(bars, fast);
    let slow_ema = ema_closes(bars, slow);
    let line: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();

    // MACD line is defined from the slow EMA seed onwards; the signal line
    // needs a further `signal_period` of those values.
    let line_start = slow - 1;
    let warmup = line_start + signal_period - 1;

    let mut signal_line = vec![0.0; bars.len()];
    if warmup < bars.len() {
        let seed = line[line_start..=warmup].iter().sum::<f64>() / signal_period as f64;
        signal_line[warmup] = seed;

        let k = 2.0 / (signal_period as f64 + 1.0);
        let mut ema = seed;
        for i in (warmup + 1)..bars.len() {
            ema = line[i] * k + ema * (1.0 - k);
            signal_line[i] = ema;
        }
    }

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint {
            date: bar.date,
            valid: i >= warmup,
            value: IndicatorValue::Macd {
                line: line[i],
                signal: signal_line[i],
                histogram: line[i] - signal_line[i],
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

pub fn calculate_macd_default(bars: &[PriceBar]) -> IndicatorSeries {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

/// Raw EMA values over closes, 0.0 inside the warm-up window.
fn ema_closes(bars: &[PriceBar], period: usize) -> Vec<f64> {
    calculate_ema(bars, period)
        .values
        .iter()
        .map(|p| p.simple().unwrap_or(0.0))
        .collect()
}
