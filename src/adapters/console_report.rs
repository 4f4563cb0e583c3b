//! Plain-text console reports.

use crate::domain::config::PipelineConfig;
use crate::domain::metrics::MetricsSummary;
use crate::domain::pipeline::{Analysis, PipelineResult};
use crate::domain::rolling::RollingSummary;

const RULE: &str = "----------------------------------------";

fn fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "nan".to_string(),
    }
}

fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "nan".to_string(),
    }
}

pub fn render_summary(m: &MetricsSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Observations (n):      {}\n", m.count));
    out.push_str(&format!("Mean daily excess:     {}\n", fixed(m.mean, 8)));
    out.push_str(&format!("Std daily excess:      {}\n", fixed(m.std, 8)));
    out.push_str(&format!("Downside std (daily):  {}\n", fixed(m.downside_std, 8)));
    out.push_str(&format!("Vol (annualized):      {}\n", fixed(m.vol_annualized, 4)));
    out.push_str(&format!("Sharpe (daily):        {}\n", fixed(m.sharpe_daily, 4)));
    out.push_str(&format!("Sharpe (annualized):   {}\n", fixed(m.sharpe_annualized, 4)));
    out.push_str(&format!("Sortino (annualized):  {}\n", fixed(m.sortino_annualized, 4)));
    out.push_str(&format!("Max Drawdown:          {}\n", percent(m.max_drawdown)));
    out.push_str(&format!("Hit rate:              {}\n", percent(m.hit_rate)));
    out.push_str(&format!("Cumulative return:     {}\n", percent(m.cumulative_return)));
    out.push_str(&format!("Crude t-stat (mean):   {}\n", fixed(m.t_stat, 4)));
    out
}

pub fn render_rolling(r: &RollingSummary) -> String {
    match r.last {
        Some(last) => format!(
            "Rolling Sharpe (ann.) window={}: {} points, last {:.4}\n",
            r.window, r.available, last
        ),
        None => format!(
            "Rolling Sharpe (ann.) window={}: insufficient data\n",
            r.window
        ),
    }
}

pub fn render_backtest(result: &PipelineResult, config: &PipelineConfig) -> String {
    let mut out = String::new();
    out.push_str("Backtest Summary\n");
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "Rows: {} | Exec basis: {} | Returns: {} | Signal: {}\n",
        result.rows(),
        config.exec_basis,
        config.return_mode,
        config.signal
    ));
    out.push_str(&format!(
        "Fee (per flip): {:.2} bps | Trade count (flips): {}\n",
        config.fee_bps,
        result.trade_count()
    ));
    if let Some(rf) = &config.riskfree_col {
        out.push_str(&format!("Risk-free column: {rf}\n"));
    }
    out.push('\n');
    out.push_str(&render_analysis(&result.analysis));
    out
}

pub fn render_returns_analysis(analysis: &Analysis) -> String {
    let mut out = String::new();
    out.push_str("Sharpe Summary (excess = strategy_return - risk_free_daily)\n");
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&render_analysis(analysis));
    out
}

fn render_analysis(analysis: &Analysis) -> String {
    let mut out = String::from("Risk Summary\n------------\n");
    out.push_str(&render_summary(&analysis.summary));
    out.push('\n');
    out.push_str(&render_rolling(&analysis.rolling_summary));
    out
}
