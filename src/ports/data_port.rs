//! Market data access port trait.

use crate::domain::error::SigchartError;
use crate::domain::price::PriceBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `ticker` within the inclusive date range.
    ///
    /// An unknown ticker or a range with no trading days yields `Ok` with an
    /// empty Vec; `Err` is reserved for transport and parse failures.
    fn fetch_daily(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SigchartError>;
}
