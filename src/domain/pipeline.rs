//! The configurable return/metrics pipeline.
//!
//! close → signal → lagged position → costs
//! exec price → returns ─┴→ strategy return → (− risk-free) → excess
//! excess → { summary metrics, rolling Sharpe }

use super::config::PipelineConfig;
use super::error::TearsheetError;
use super::frame::Frame;
use super::metrics::{equity_curve, MetricsSummary};
use super::position::{lag_signal, CostModel, TradingCosts};
use super::returns::compute_returns;
use super::rolling::{rolling_sharpe, summarize, RollingSummary};
use super::series::TimeSeries;
use super::signal::generate_signals;
use super::strategy_return::{compose, StrategyReturns};

/// Statistics derived from an excess-return series.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub summary: MetricsSummary,
    pub rolling: TimeSeries<f64>,
    pub rolling_summary: RollingSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub returns: TimeSeries<f64>,
    pub signal: TimeSeries<u8>,
    pub position: TimeSeries<u8>,
    pub costs: TradingCosts,
    pub strategy: StrategyReturns,
    pub equity: TimeSeries<f64>,
    pub analysis: Analysis,
}

impl PipelineResult {
    pub fn trade_count(&self) -> usize {
        self.costs.trade_count
    }

    pub fn rows(&self) -> usize {
        self.returns.len()
    }
}

/// Run the full price-based pipeline over `frame`.
///
/// Every column the configuration needs is checked before any computation,
/// so a schema error never leaves a partial result behind.
pub fn run_pipeline(
    frame: &Frame,
    config: &PipelineConfig,
) -> Result<PipelineResult, TearsheetError> {
    let exec_col = config.exec_basis.column();
    let mut required = vec!["close"];
    for name in std::iter::once(exec_col).chain(config.riskfree_col.as_deref()) {
        if !required.contains(&name) {
            required.push(name);
        }
    }
    frame.require(&required)?;

    let close = frame.column("close")?;
    let exec_prices = frame.column(exec_col)?;
    let riskfree = config
        .riskfree_col
        .as_deref()
        .map(|name| frame.column(name))
        .transpose()?;

    let returns = compute_returns(&exec_prices, config.return_mode)?;

    let rule = config.signal.generator();
    let signal = generate_signals(rule.as_ref(), &close);
    let position = lag_signal(&signal);
    let costs = CostModel::new(config.fee_bps).apply(&position);

    let strategy = compose(&position, &returns, &costs.cost, riskfree.as_ref())?;

    let equity_values = equity_curve(&strategy.excess.defined());
    let equity = if equity_values.len() == strategy.excess.len() {
        strategy
            .excess
            .with_values(equity_values.into_iter().map(Some).collect())
    } else {
        strategy.excess.with_values(vec![None; strategy.excess.len()])
    };

    let analysis = analyze_excess(&strategy.excess, config)?;

    Ok(PipelineResult {
        returns,
        signal,
        position,
        costs,
        strategy,
        equity,
        analysis,
    })
}

/// Summary and rolling statistics for an already-formed excess series.
pub fn analyze_excess(
    excess: &TimeSeries<f64>,
    config: &PipelineConfig,
) -> Result<Analysis, TearsheetError> {
    let window = config.effective_window();
    let summary = MetricsSummary::compute(excess, config.trading_days);
    let rolling = rolling_sharpe(excess, window, config.trading_days)?;
    let rolling_summary = summarize(&rolling, window);
    Ok(Analysis {
        summary,
        rolling,
        rolling_summary,
    })
}

/// Excess returns from a frame of pre-computed strategy and risk-free returns.
pub fn excess_from_returns(
    frame: &Frame,
    strategy_col: &str,
    riskfree_col: &str,
) -> Result<TimeSeries<f64>, TearsheetError> {
    frame.require(&[strategy_col, riskfree_col])?;
    let strategy = frame.column(strategy_col)?;
    let riskfree = frame.column(riskfree_col)?;
    let values = (0..strategy.len())
        .map(|t| match (strategy.get(t), riskfree.get(t)) {
            (Some(s), Some(rf)) => Some(s - rf),
            _ => None,
        })
        .collect();
    Ok(strategy.with_values(values))
}
