//! Local CSV file data adapter.
//!
//! Reads `<TICKER>.csv` files (date,open,high,low,close,volume) from a base
//! directory. Useful for offline runs and tests; files in this layout can be
//! produced with the `fetch` subcommand. A missing file is treated like an
//! unknown ticker: an empty series, not an error.

use crate::domain::error::SigchartError;
use crate::domain::price::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker.to_uppercase()))
    }
}

impl DataPort for CsvDataAdapter {
    fn fetch_daily(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SigchartError> {
        let path = self.csv_path(ticker);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).map_err(|e| SigchartError::Fetch {
            ticker: ticker.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| SigchartError::Fetch {
                ticker: ticker.to_string(),
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = field(ticker, &record, 0, "date")?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                SigchartError::Fetch {
                    ticker: ticker.to_string(),
                    reason: format!("invalid date in {}: {}", path.display(), e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(PriceBar {
                ticker: ticker.to_string(),
                date,
                open: parse_f64(ticker, &record, 1, "open")?,
                high: parse_f64(ticker, &record, 2, "high")?,
                low: parse_f64(ticker, &record, 3, "low")?,
                close: parse_f64(ticker, &record, 4, "close")?,
                volume: field(ticker, &record, 5, "volume")?.parse().unwrap_or(0),
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn field<'r>(
    ticker: &str,
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<&'r str, SigchartError> {
    record.get(index).ok_or_else(|| SigchartError::Fetch {
        ticker: ticker.to_string(),
        reason: format!("missing {} column", name),
    })
}

fn parse_f64(
    ticker: &str,
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<f64, SigchartError> {
    field(ticker, record, index, name)?
        .parse()
        .map_err(|e| SigchartError::Fetch {
            ticker: ticker.to_string(),
            reason: format!("invalid {} value: {}", name, e),
        })
}
