//! Shared helpers for integration tests.

use chrono::{Days, NaiveDate};
use sigchart::domain::analysis::{AnalysisRequest, IndicatorParams};
use sigchart::domain::error::SigchartError;
use sigchart::domain::price::PriceBar;
use sigchart::domain::signal::SignalThresholds;
use sigchart::ports::data_port::DataPort;
use std::collections::HashMap;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(ticker: &str, date: NaiveDate, close: f64) -> PriceBar {
    PriceBar {
        ticker: ticker.to_string(),
        date,
        open: close,
        high: close,
        low: close,
        close,
        volume: 1000,
    }
}

/// One bar per close, consecutive days from 2024-01-01.
pub fn bars_from_closes(ticker: &str, closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let day = date(2024, 1, 1).checked_add_days(Days::new(i as u64)).unwrap();
            make_bar(ticker, day, close)
        })
        .collect()
}

pub fn sample_request(ticker: &str) -> AnalysisRequest {
    AnalysisRequest {
        ticker: ticker.to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        params: IndicatorParams::default(),
        thresholds: SignalThresholds::default(),
    }
}

/// In-memory data port keyed by ticker.
pub struct MockDataPort {
    bars: HashMap<String, Vec<PriceBar>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.bars.insert(ticker.to_string(), bars);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_daily(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SigchartError> {
        Ok(self
            .bars
            .get(ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
