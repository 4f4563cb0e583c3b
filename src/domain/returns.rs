//! Period-over-period returns from a price series.
//!
//! simple: r[t] = P[t] / P[t-1] - 1
//! log:    r[t] = ln(P[t]) - ln(P[t-1])
//! r[0] is always undefined, as is any r[t] whose price pair is incomplete.

use std::fmt;

use super::error::TearsheetError;
use super::series::TimeSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnMode {
    #[default]
    Simple,
    Log,
}

impl fmt::Display for ReturnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnMode::Simple => write!(f, "simple"),
            ReturnMode::Log => write!(f, "log"),
        }
    }
}

pub fn compute_returns(
    prices: &TimeSeries<f64>,
    mode: ReturnMode,
) -> Result<TimeSeries<f64>, TearsheetError> {
    if mode == ReturnMode::Log {
        if let Some((date, price)) = prices
            .iter()
            .find_map(|(date, p)| p.filter(|&p| p <= 0.0).map(|p| (date, p)))
        {
            return Err(TearsheetError::invalid_input(format!(
                "non-positive price {price} on {date} cannot be used with log returns"
            )));
        }
    }

    let values = prices.values();
    let mut returns = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let r = if i == 0 {
            None
        } else {
            match (values[i - 1], values[i]) {
                (Some(prev), Some(curr)) => match mode {
                    ReturnMode::Simple if prev != 0.0 => Some(curr / prev - 1.0),
                    ReturnMode::Simple => None,
                    ReturnMode::Log => Some(curr.ln() - prev.ln()),
                },
                _ => None,
            }
        };
        returns.push(r);
    }

    Ok(prices.with_values(returns))
}
