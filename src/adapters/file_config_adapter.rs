//! INI file configuration adapter.
//!
//! ```ini
//! [pipeline]
//! fee_bps = 1.5
//! use_log_returns = false
//! exec_basis = close
//! window = 60
//! riskfree_col = rf_daily
//!
//! [output]
//! tearsheet = out/tearsheet.csv
//! chart = out/rolling_sharpe.svg
//! ```

use crate::domain::error::TearsheetError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl Default for FileConfigAdapter {
    fn default() -> Self {
        Self { config: Ini::new() }
    }
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TearsheetError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| TearsheetError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, TearsheetError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| TearsheetError::ConfigParse {
                file: "<string>".into(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn invalid(section: &str, key: &str, expected: &str, reason: String) -> TearsheetError {
        TearsheetError::config_invalid(section, key, format!("expected {expected}: {reason}"))
    }

    /// Blank values count as absent before any typed parse is attempted.
    fn is_set(&self, section: &str, key: &str) -> bool {
        self.get_string(section, key).is_some()
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn get_f64(&self, section: &str, key: &str) -> Result<Option<f64>, TearsheetError> {
        if !self.is_set(section, key) {
            return Ok(None);
        }
        self.config
            .getfloat(section, key)
            .map_err(|e| Self::invalid(section, key, "a number", e))
    }

    fn get_usize(&self, section: &str, key: &str) -> Result<Option<usize>, TearsheetError> {
        if !self.is_set(section, key) {
            return Ok(None);
        }
        let value = self
            .config
            .getuint(section, key)
            .map_err(|e| Self::invalid(section, key, "a non-negative integer", e))?;
        value
            .map(|v| {
                usize::try_from(v)
                    .map_err(|e| Self::invalid(section, key, "a non-negative integer", e.to_string()))
            })
            .transpose()
    }

    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, TearsheetError> {
        if !self.is_set(section, key) {
            return Ok(None);
        }
        self.config
            .getboolcoerce(section, key)
            .map_err(|e| Self::invalid(section, key, "a boolean", e))
    }
}
