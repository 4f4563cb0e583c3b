//! Trailing-window annualized Sharpe.
//!
//! rolling[t] = mean(x[t-w+1..=t]) / std(x[t-w+1..=t]) * sqrt(trading_days)
//! A point is defined only when all w samples ending at t are defined and
//! their deviation is non-zero.

use super::error::TearsheetError;
use super::metrics::annualized_sharpe;
use super::series::TimeSeries;

pub const MIN_WINDOW: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingSummary {
    pub window: usize,
    pub available: usize,
    pub last: Option<f64>,
}

pub fn rolling_sharpe(
    excess: &TimeSeries<f64>,
    window: usize,
    trading_days: f64,
) -> Result<TimeSeries<f64>, TearsheetError> {
    if window < MIN_WINDOW {
        return Err(TearsheetError::invalid_input(format!(
            "rolling window must be at least {MIN_WINDOW}, got {window}"
        )));
    }

    let values = excess.values();
    let mut out = vec![None; values.len()];
    let mut buf: Vec<f64> = Vec::with_capacity(window);

    for t in (window - 1)..values.len() {
        buf.clear();
        buf.extend(values[t + 1 - window..=t].iter().map_while(|v| *v));
        if buf.len() == window {
            out[t] = annualized_sharpe(&buf, trading_days);
        }
    }

    Ok(excess.with_values(out))
}

pub fn summarize(rolling: &TimeSeries<f64>, window: usize) -> RollingSummary {
    RollingSummary {
        window,
        available: rolling.defined_count(),
        last: rolling.last_defined(),
    }
}
