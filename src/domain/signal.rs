//! Signal generation.
//!
//! A rule only ever sees a [`History`] truncated at the decision date, so a
//! signal for date t cannot be computed from prices after t.

use super::series::TimeSeries;

pub const FLAT: u8 = 0;
pub const LONG: u8 = 1;

/// Close prices up to and including the decision date.
#[derive(Debug, Clone, Copy)]
pub struct History<'a> {
    close: &'a [Option<f64>],
}

impl<'a> History<'a> {
    pub fn new(close: &'a [Option<f64>]) -> Self {
        Self { close }
    }

    /// Number of bars available, the decision bar included.
    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// Close `bars_ago` bars before the decision bar (0 = the decision bar).
    pub fn close_ago(&self, bars_ago: usize) -> Option<f64> {
        let idx = self.close.len().checked_sub(bars_ago + 1)?;
        self.close[idx]
    }

    /// Simple return realised `bars_ago` bars before the decision bar.
    pub fn return_ago(&self, bars_ago: usize) -> Option<f64> {
        let curr = self.close_ago(bars_ago)?;
        let prev = self.close_ago(bars_ago + 1)?;
        if prev == 0.0 {
            None
        } else {
            Some(curr / prev - 1.0)
        }
    }
}

pub trait SignalGenerator {
    fn name(&self) -> &'static str;

    /// Position indicator (FLAT or LONG) for the last bar of `history`.
    fn decide(&self, history: &History<'_>) -> u8;
}

/// Long today if yesterday's close-to-close return was negative.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrevDayDown;

impl SignalGenerator for PrevDayDown {
    fn name(&self) -> &'static str {
        "prev_down"
    }

    fn decide(&self, history: &History<'_>) -> u8 {
        match history.return_ago(1) {
            Some(r) if r < 0.0 => LONG,
            _ => FLAT,
        }
    }
}

/// Long while the close is above the close `lookback` bars earlier.
#[derive(Debug, Clone, Copy)]
pub struct Momentum {
    pub lookback: usize,
}

impl SignalGenerator for Momentum {
    fn name(&self) -> &'static str {
        "momentum"
    }

    fn decide(&self, history: &History<'_>) -> u8 {
        match (history.close_ago(0), history.close_ago(self.lookback)) {
            (Some(now), Some(then)) if now > then => LONG,
            _ => FLAT,
        }
    }
}

/// Run `rule` over every prefix of `close`. Every output value is defined.
pub fn generate_signals(rule: &dyn SignalGenerator, close: &TimeSeries<f64>) -> TimeSeries<u8> {
    let values = close.values();
    let signals = (0..values.len())
        .map(|t| Some(rule.decide(&History::new(&values[..=t]))))
        .collect();
    close.with_values(signals)
}
