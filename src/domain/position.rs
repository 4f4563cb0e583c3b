//! Position lagging and flip costs.
//!
//! position[t] = signal[t-1], position[0] = FLAT. A signal decided on the
//! close of day t therefore only earns day t+1's return.
//!
//! flip[t] = |position[t] - position[t-1]|, flip[0] = 0, and every flip is
//! charged fee_bps / 10000 once. Entries and exits cost the same.

use super::series::TimeSeries;
use super::signal::FLAT;

const BPS_PER_UNIT: f64 = 10_000.0;

pub fn lag_signal(signal: &TimeSeries<u8>) -> TimeSeries<u8> {
    let values = signal.values();
    let positions = (0..values.len())
        .map(|t| {
            if t == 0 {
                Some(FLAT)
            } else {
                Some(values[t - 1].unwrap_or(FLAT))
            }
        })
        .collect();
    signal.with_values(positions)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    fee_bps: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradingCosts {
    pub flips: TimeSeries<u8>,
    pub cost: TimeSeries<f64>,
    pub trade_count: usize,
}

impl CostModel {
    pub fn new(fee_bps: f64) -> Self {
        Self { fee_bps }
    }

    pub fn fee_bps(&self) -> f64 {
        self.fee_bps
    }

    pub fn fee_rate(&self) -> f64 {
        self.fee_bps / BPS_PER_UNIT
    }

    pub fn apply(&self, position: &TimeSeries<u8>) -> TradingCosts {
        let values = position.values();
        let fee_rate = self.fee_rate();
        let mut flips = Vec::with_capacity(values.len());
        let mut cost = Vec::with_capacity(values.len());
        let mut trade_count = 0usize;

        for t in 0..values.len() {
            let flip = if t == 0 {
                0
            } else {
                let prev = values[t - 1].unwrap_or(FLAT);
                let curr = values[t].unwrap_or(FLAT);
                prev.abs_diff(curr)
            };
            trade_count += flip as usize;
            flips.push(Some(flip));
            cost.push(Some(flip as f64 * fee_rate));
        }

        TradingCosts {
            flips: position.with_values(flips),
            cost: position.with_values(cost),
            trade_count,
        }
    }
}
