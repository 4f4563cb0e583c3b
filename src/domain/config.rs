//! Pipeline configuration record.

use std::fmt;
use std::str::FromStr;

use super::metrics::TRADING_DAYS_PER_YEAR;
use super::returns::ReturnMode;
use super::signal::{Momentum, PrevDayDown, SignalGenerator};

/// Callers never roll over fewer than this many periods.
pub const WINDOW_FLOOR: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecBasis {
    Open,
    #[default]
    Close,
}

impl ExecBasis {
    pub fn column(&self) -> &'static str {
        match self {
            ExecBasis::Open => "open",
            ExecBasis::Close => "close",
        }
    }
}

impl fmt::Display for ExecBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for ExecBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(ExecBasis::Open),
            "close" => Ok(ExecBasis::Close),
            other => Err(format!("expected 'open' or 'close', got '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalRule {
    #[default]
    PrevDown,
    Momentum { lookback: usize },
}

impl SignalRule {
    pub fn parse(name: &str, momentum_lookback: usize) -> Result<Self, String> {
        match name.trim().to_lowercase().as_str() {
            "prev_down" => Ok(SignalRule::PrevDown),
            "momentum" => Ok(SignalRule::Momentum {
                lookback: momentum_lookback,
            }),
            other => Err(format!("unknown signal rule '{other}'")),
        }
    }

    pub fn generator(&self) -> Box<dyn SignalGenerator> {
        match *self {
            SignalRule::PrevDown => Box::new(PrevDayDown),
            SignalRule::Momentum { lookback } => Box::new(Momentum { lookback }),
        }
    }
}

impl fmt::Display for SignalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalRule::PrevDown => write!(f, "prev_down"),
            SignalRule::Momentum { lookback } => write!(f, "momentum({lookback})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub fee_bps: f64,
    pub return_mode: ReturnMode,
    pub exec_basis: ExecBasis,
    pub window: usize,
    pub riskfree_col: Option<String>,
    pub trading_days: f64,
    pub signal: SignalRule,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fee_bps: 1.0,
            return_mode: ReturnMode::Simple,
            exec_basis: ExecBasis::Close,
            window: 60,
            riskfree_col: None,
            trading_days: TRADING_DAYS_PER_YEAR,
            signal: SignalRule::PrevDown,
        }
    }
}

impl PipelineConfig {
    /// Requested window, floored at [`WINDOW_FLOOR`].
    pub fn effective_window(&self) -> usize {
        self.window.max(WINDOW_FLOOR)
    }
}
