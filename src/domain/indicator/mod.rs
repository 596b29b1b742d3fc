//! Technical indicator implementations.
//!
//! Every calculation returns exactly one [`IndicatorPoint`] per input bar, so
//! indicator series stay aligned 1:1 by date with the price series. Points
//! inside the warm-up window carry `valid: false` and a zero value.

pub mod ema;
pub mod macd;
pub mod rsi;

pub use ema::calculate_ema;
pub use macd::{calculate_macd, calculate_macd_default};
pub use rsi::calculate_rsi;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

impl IndicatorPoint {
    pub(crate) fn invalid(date: NaiveDate, value: IndicatorValue) -> Self {
        Self {
            date,
            valid: false,
            value,
        }
    }

    /// The scalar value, if this point is valid and holds one.
    pub fn simple(&self) -> Option<f64> {
        match self.value {
            IndicatorValue::Simple(v) if self.valid => Some(v),
            _ => None,
        }
    }

    /// The (line, signal, histogram) triple, if this point is a valid MACD value.
    pub fn macd(&self) -> Option<(f64, f64, f64)> {
        match self.value {
            IndicatorValue::Macd {
                line,
                signal,
                histogram,
            } if self.valid => Some((line, signal, histogram)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}
