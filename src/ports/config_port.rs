//! Configuration access port trait.
//!
//! Missing keys yield `Ok(None)`; present but malformed values are errors, so a
//! typo in a config file is never silently replaced by a default.

use crate::domain::error::TearsheetError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_f64(&self, section: &str, key: &str) -> Result<Option<f64>, TearsheetError>;
    fn get_usize(&self, section: &str, key: &str) -> Result<Option<usize>, TearsheetError>;
    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, TearsheetError>;
}
