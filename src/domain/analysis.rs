//! The fetch-compute-signal pipeline.
//!
//! One [`AnalysisRequest`] describes a single run: ticker, date range,
//! indicator parameters, and signal thresholds. [`run`] fetches through a
//! [`DataPort`] and hands the bars to [`compute`], which is pure. An empty
//! fetch result flows through as an empty [`Analysis`] rather than an error.

use chrono::NaiveDate;

use crate::domain::error::SigchartError;
use crate::domain::indicator::{calculate_macd, calculate_rsi, macd, rsi, IndicatorSeries};
use crate::domain::price::{self, PriceBar};
use crate::domain::signal::{generate_signals, SignalSeries, SignalThresholds};
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: rsi::DEFAULT_PERIOD,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
        }
    }
}

/// Request-scoped configuration for one analysis pass.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub params: IndicatorParams,
    pub thresholds: SignalThresholds,
}

impl AnalysisRequest {
    pub fn validate(&self) -> Result<(), SigchartError> {
        if self.ticker.trim().is_empty() {
            return Err(invalid("analysis", "ticker", "must not be empty"));
        }
        if self.start_date > self.end_date {
            return Err(invalid(
                "analysis",
                "start_date",
                "must not be after end_date",
            ));
        }
        if self.params.rsi_period == 0 {
            return Err(invalid("indicators", "rsi_period", "must be positive"));
        }
        if self.params.macd_fast == 0 || self.params.macd_slow == 0 || self.params.macd_signal == 0
        {
            return Err(invalid("indicators", "macd", "periods must be positive"));
        }
        if self.params.macd_fast >= self.params.macd_slow {
            return Err(invalid(
                "indicators",
                "macd_fast",
                "must be smaller than macd_slow",
            ));
        }
        if self.thresholds.rsi_buy_below >= self.thresholds.rsi_sell_above {
            return Err(invalid(
                "signals",
                "rsi_buy_below",
                "must be below rsi_sell_above",
            ));
        }
        Ok(())
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> SigchartError {
    SigchartError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: reason.into(),
    }
}

/// A complete analysis result: bars plus aligned indicator and signal series.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
    pub rsi: IndicatorSeries,
    pub macd: IndicatorSeries,
    pub signals: SignalSeries,
}

impl Analysis {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Fetch daily bars through `data_port` and compute indicators and signals.
pub fn run(
    data_port: &dyn DataPort,
    request: &AnalysisRequest,
) -> Result<Analysis, SigchartError> {
    request.validate()?;
    let bars = data_port.fetch_daily(&request.ticker, request.start_date, request.end_date)?;
    Ok(compute(request, bars))
}

/// Pure computation stage: normalize bars, derive RSI, MACD, and signals.
pub fn compute(request: &AnalysisRequest, bars: Vec<PriceBar>) -> Analysis {
    let bars = price::normalize(bars);
    let rsi = calculate_rsi(&bars, request.params.rsi_period);
    let macd = calculate_macd(
        &bars,
        request.params.macd_fast,
        request.params.macd_slow,
        request.params.macd_signal,
    );
    let signals = generate_signals(&rsi, &macd, request.thresholds);

    Analysis {
        ticker: request.ticker.clone(),
        bars,
        rsi,
        macd,
        signals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> AnalysisRequest {
        AnalysisRequest {
            ticker: "AAPL.US".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            params: IndicatorParams::default(),
            thresholds: SignalThresholds::default(),
        }
    }

    fn bar(day: u64, close: f64) -> PriceBar {
        PriceBar {
            ticker: "AAPL.US".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .checked_add_days(chrono::Days::new(day))
                .unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn default_params_match_conventional_values() {
        let params = IndicatorParams::default();
        assert_eq!(params.rsi_period, 14);
        assert_eq!(params.macd_fast, 12);
        assert_eq!(params.macd_slow, 26);
        assert_eq!(params.macd_signal, 9);
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(sample_request().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_ticker() {
        let mut request = sample_request();
        request.ticker = "  ".into();
        assert!(request.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_date_range() {
        let mut request = sample_request();
        request.start_date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn validate_rejects_fast_not_below_slow() {
        let mut request = sample_request();
        request.params.macd_fast = 26;
        assert!(request.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_periods() {
        let mut request = sample_request();
        request.params.rsi_period = 0;
        assert!(request.validate().is_err());

        let mut request = sample_request();
        request.params.macd_signal = 0;
        assert!(request.validate().is_err());
    }

    #[test]
    fn validate_rejects_crossed_thresholds() {
        let mut request = sample_request();
        request.thresholds.rsi_buy_below = 70.0;
        request.thresholds.rsi_sell_above = 30.0;
        assert!(request.validate().is_err());
    }

    #[test]
    fn compute_keeps_all_series_aligned() {
        let bars: Vec<PriceBar> = (0..50).map(|i| bar(i, 100.0 + (i % 7) as f64)).collect();
        let analysis = compute(&sample_request(), bars);

        let n = analysis.bars.len();
        assert_eq!(analysis.rsi.values.len(), n);
        assert_eq!(analysis.macd.values.len(), n);
        assert_eq!(analysis.signals.points.len(), n);

        for i in 0..n {
            let date = analysis.bars[i].date;
            assert_eq!(analysis.rsi.values[i].date, date);
            assert_eq!(analysis.macd.values[i].date, date);
            assert_eq!(analysis.signals.points[i].date, date);
        }
    }

    #[test]
    fn compute_normalizes_unsorted_input() {
        let bars = vec![bar(2, 102.0), bar(0, 100.0), bar(1, 101.0), bar(1, 105.0)];
        let analysis = compute(&sample_request(), bars);

        assert_eq!(analysis.bars.len(), 3);
        assert!(analysis.bars.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(analysis.bars[1].close, 105.0);
    }

    #[test]
    fn compute_with_empty_bars_is_empty_everywhere() {
        let analysis = compute(&sample_request(), Vec::new());

        assert!(analysis.is_empty());
        assert!(analysis.rsi.values.is_empty());
        assert!(analysis.macd.values.is_empty());
        assert!(analysis.signals.points.is_empty());
    }
}
