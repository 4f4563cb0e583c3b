//! Tabular input port trait.

use crate::domain::error::TearsheetError;
use crate::domain::frame::Frame;
use std::path::Path;

pub trait DataPort {
    /// Load a date-indexed table. Rows come back in ascending date order.
    fn load_frame(&self, source: &Path) -> Result<Frame, TearsheetError>;
}
