//! Net strategy and excess returns.
//!
//! strategy[t] = position[t] * realized[t] - cost[t]
//! excess[t]   = strategy[t] - riskfree[t]   (or strategy[t] without a risk-free series)
//!
//! An undefined realized return contributes nothing (there is no exposure
//! to attribute), and an undefined risk-free cell counts as zero.

use super::error::TearsheetError;
use super::series::TimeSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyReturns {
    pub strategy: TimeSeries<f64>,
    pub excess: TimeSeries<f64>,
}

pub fn compose(
    position: &TimeSeries<u8>,
    realized: &TimeSeries<f64>,
    cost: &TimeSeries<f64>,
    riskfree: Option<&TimeSeries<f64>>,
) -> Result<StrategyReturns, TearsheetError> {
    if !position.same_index(realized) || !position.same_index(cost) {
        return Err(TearsheetError::schema(
            "position, return and cost series must share the same dates",
        ));
    }
    if let Some(rf) = riskfree {
        if !rf.same_index(realized) {
            return Err(TearsheetError::schema(format!(
                "risk-free series is not aligned with the return series ({} vs {} rows)",
                rf.len(),
                realized.len()
            )));
        }
    }

    let strategy: Vec<Option<f64>> = (0..position.len())
        .map(|t| {
            let exposure = position.get(t).unwrap_or(0) as f64;
            let r = realized.get(t).unwrap_or(0.0);
            Some(exposure * r - cost.get(t).unwrap_or(0.0))
        })
        .collect();

    let excess = match riskfree {
        Some(rf) => strategy
            .iter()
            .enumerate()
            .map(|(t, s)| s.map(|s| s - rf.get(t).unwrap_or(0.0)))
            .collect(),
        None => strategy.clone(),
    };

    Ok(StrategyReturns {
        strategy: realized.with_values(strategy),
        excess: realized.with_values(excess),
    })
}
