//! Configuration validation.
//!
//! Runs on the fully merged configuration (file values plus CLI overrides)
//! before any input is read.

use super::config::{PipelineConfig, SignalRule};
use super::error::TearsheetError;
use super::rolling::MIN_WINDOW;

const SECTION: &str = "pipeline";

pub fn validate_pipeline_config(config: &PipelineConfig) -> Result<(), TearsheetError> {
    validate_fee(config)?;
    validate_window(config)?;
    validate_trading_days(config)?;
    validate_riskfree_col(config)?;
    validate_signal(config)?;
    Ok(())
}

fn validate_fee(config: &PipelineConfig) -> Result<(), TearsheetError> {
    if !config.fee_bps.is_finite() || config.fee_bps < 0.0 {
        return Err(TearsheetError::config_invalid(
            SECTION,
            "fee_bps",
            "fee_bps must be a non-negative number",
        ));
    }
    Ok(())
}

fn validate_window(config: &PipelineConfig) -> Result<(), TearsheetError> {
    if config.window < MIN_WINDOW {
        return Err(TearsheetError::config_invalid(
            SECTION,
            "window",
            format!("window must be at least {MIN_WINDOW}"),
        ));
    }
    Ok(())
}

fn validate_trading_days(config: &PipelineConfig) -> Result<(), TearsheetError> {
    if !config.trading_days.is_finite() || config.trading_days <= 0.0 {
        return Err(TearsheetError::config_invalid(
            SECTION,
            "trading_days",
            "trading_days must be positive",
        ));
    }
    Ok(())
}

fn validate_riskfree_col(config: &PipelineConfig) -> Result<(), TearsheetError> {
    if let Some(col) = &config.riskfree_col {
        if col.trim().is_empty() {
            return Err(TearsheetError::config_invalid(
                SECTION,
                "riskfree_col",
                "riskfree_col must not be empty",
            ));
        }
        if col == "date" {
            return Err(TearsheetError::config_invalid(
                SECTION,
                "riskfree_col",
                "riskfree_col cannot be the date column",
            ));
        }
    }
    Ok(())
}

fn validate_signal(config: &PipelineConfig) -> Result<(), TearsheetError> {
    if let SignalRule::Momentum { lookback } = config.signal {
        if lookback == 0 {
            return Err(TearsheetError::config_invalid(
                SECTION,
                "momentum_lookback",
                "momentum_lookback must be at least 1",
            ));
        }
    }
    Ok(())
}
