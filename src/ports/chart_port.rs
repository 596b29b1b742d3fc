//! Chart rendering port trait.

use std::path::Path;

use crate::domain::analysis::Analysis;
use crate::domain::error::SigchartError;

/// Port for rendering an analysis (close prices plus buy/sell markers).
pub trait ChartPort {
    fn write(&self, analysis: &Analysis, output_path: &Path) -> Result<(), SigchartError>;
}
