//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for sigchart.
#[derive(Debug, thiserror::Error)]
pub enum SigchartError {
    #[error("failed to fetch {ticker}: {reason}")]
    Fetch { ticker: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {ticker} between {start} and {end}")]
    NoData {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SigchartError> for std::process::ExitCode {
    fn from(err: &SigchartError) -> Self {
        let code: u8 = match err {
            SigchartError::Io(_) => 1,
            SigchartError::ConfigParse { .. } | SigchartError::ConfigInvalid { .. } => 2,
            SigchartError::Fetch { .. } => 3,
            SigchartError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
