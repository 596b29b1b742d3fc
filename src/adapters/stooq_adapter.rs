//! Stooq daily-quote HTTP adapter.
//!
//! Downloads history from the Stooq CSV endpoint:
//! `/q/d/l/?s=<ticker>&d1=<yyyymmdd>&d2=<yyyymmdd>&i=d`.
//! Unknown tickers and ranges without trading days come back as a plain-text
//! "No data" body, which maps to an empty series rather than an error.

use crate::domain::error::SigchartError;
use crate::domain::price::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;

pub struct StooqAdapter {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl StooqAdapter {
    pub fn new() -> Self {
        Self::with_base_url("https://stooq.com")
    }

    /// Point the adapter at a different host (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn quote_url(&self, ticker: &str, start_date: NaiveDate, end_date: NaiveDate) -> String {
        format!(
            "{}/q/d/l/?s={}&d1={}&d2={}&i=d",
            self.base_url,
            ticker.to_lowercase(),
            start_date.format("%Y%m%d"),
            end_date.format("%Y%m%d"),
        )
    }
}

impl Default for StooqAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DataPort for StooqAdapter {
    fn fetch_daily(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SigchartError> {
        let url = self.quote_url(ticker, start_date, end_date);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| fetch_error(ticker, e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_error(ticker, format!("HTTP {}", response.status())));
        }

        let body = response
            .text()
            .map_err(|e| fetch_error(ticker, e.to_string()))?;

        parse_quote_csv(ticker, &body, start_date, end_date)
    }
}

fn fetch_error(ticker: &str, reason: String) -> SigchartError {
    SigchartError::Fetch {
        ticker: ticker.to_string(),
        reason,
    }
}

/// Parse a Stooq quote body. Non-CSV bodies ("No data", error pages) yield an
/// empty series.
pub(crate) fn parse_quote_csv(
    ticker: &str,
    body: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<PriceBar>, SigchartError> {
    if !body.starts_with("Date,") {
        return Ok(Vec::new());
    }

    let mut rdr = csv::Reader::from_reader(body.as_bytes());
    let mut bars = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| fetch_error(ticker, format!("CSV parse error: {}", e)))?;

        let date_str = record
            .get(0)
            .ok_or_else(|| fetch_error(ticker, "missing date column".into()))?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|e| fetch_error(ticker, format!("invalid date {:?}: {}", date_str, e)))?;

        if date < start_date || date > end_date {
            continue;
        }

        let open = parse_price(ticker, &record, 1, "open")?;
        let high = parse_price(ticker, &record, 2, "high")?;
        let low = parse_price(ticker, &record, 3, "low")?;
        let close = parse_price(ticker, &record, 4, "close")?;

        // Volume is absent for indices and some instruments.
        let volume = record
            .get(5)
            .and_then(|v| v.parse::<f64>().ok())
            .map(|v| v as i64)
            .unwrap_or(0);

        bars.push(PriceBar {
            ticker: ticker.to_string(),
            date,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

fn parse_price(
    ticker: &str,
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<f64, SigchartError> {
    record
        .get(index)
        .ok_or_else(|| fetch_error(ticker, format!("missing {} column", name)))?
        .parse()
        .map_err(|e| fetch_error(ticker, format!("invalid {} value: {}", name, e)))
}
