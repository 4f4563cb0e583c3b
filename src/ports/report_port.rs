//! Report persistence port trait.

use crate::domain::error::TearsheetError;
use crate::domain::metrics::MetricsSummary;
use std::path::Path;

/// Port for persisting a run's summary as a single-row tearsheet.
pub trait ReportPort {
    fn write_tearsheet(
        &self,
        summary: &MetricsSummary,
        output_path: &Path,
    ) -> Result<(), TearsheetError>;
}
