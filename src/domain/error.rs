//! Domain error types.
//!
//! Structural and input problems abort a run. Statistically undefined metrics
//! are not errors; they are `None` inside the result types.

/// Top-level error type for tearsheet.
#[derive(Debug, thiserror::Error)]
pub enum TearsheetError {
    #[error("schema error: {reason}")]
    Schema { reason: String },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("csv error: {reason}")]
    Csv { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TearsheetError {
    pub fn schema(reason: impl Into<String>) -> Self {
        TearsheetError::Schema {
            reason: reason.into(),
        }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        TearsheetError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        TearsheetError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for TearsheetError {
    fn from(err: csv::Error) -> Self {
        TearsheetError::Csv {
            reason: err.to_string(),
        }
    }
}

impl From<&TearsheetError> for std::process::ExitCode {
    fn from(err: &TearsheetError) -> Self {
        let code: u8 = match err {
            TearsheetError::Io(_) => 1,
            TearsheetError::ConfigParse { .. } | TearsheetError::ConfigInvalid { .. } => 2,
            TearsheetError::Schema { .. } | TearsheetError::Csv { .. } => 3,
            TearsheetError::InvalidInput { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
