//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::chart_svg;
use crate::adapters::console_report;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config::{ExecBasis, PipelineConfig, SignalRule};
use crate::domain::config_validation::validate_pipeline_config;
use crate::domain::error::TearsheetError;
use crate::domain::pipeline::{analyze_excess, excess_from_returns, run_pipeline, Analysis};
use crate::domain::returns::ReturnMode;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const PIPELINE: &str = "pipeline";
const OUTPUT: &str = "output";
const DEFAULT_MOMENTUM_LOOKBACK: usize = 20;

pub const STRATEGY_RETURN_COL: &str = "strategy_return";
pub const RISK_FREE_DAILY_COL: &str = "risk_free_daily";

#[derive(Parser, Debug)]
#[command(name = "tearsheet", about = "Risk and performance statistics for a long/flat strategy")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest the long/flat rule over a price CSV (date, close[, open])
    Backtest(BacktestArgs),
    /// Sharpe statistics for a CSV of date, strategy_return, risk_free_daily
    Sharpe(SharpeArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Write a single-row CSV tearsheet of the summary metrics
    #[arg(long)]
    pub tearsheet: Option<PathBuf>,
    /// Write an SVG chart of the rolling Sharpe series
    #[arg(long)]
    pub chart: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BacktestArgs {
    pub csv: PathBuf,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Trading cost per position flip, in basis points
    #[arg(long)]
    pub fee_bps: Option<f64>,
    #[arg(long)]
    pub use_log_returns: bool,
    /// Force simple returns even when the config file enables log returns
    #[arg(long, conflicts_with = "use_log_returns")]
    pub simple_returns: bool,
    /// Price column feeding the realized return
    #[arg(long = "exec", value_parser = ["open", "close"])]
    pub exec: Option<String>,
    /// Rolling Sharpe window in trading days (floored at 5)
    #[arg(long)]
    pub window: Option<usize>,
    /// Daily risk-free return column to subtract
    #[arg(long)]
    pub riskfree_col: Option<String>,
    #[arg(long, value_parser = ["prev_down", "momentum"])]
    pub signal: Option<String>,
    #[arg(long)]
    pub momentum_lookback: Option<usize>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SharpeArgs {
    pub csv: PathBuf,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Rolling Sharpe window in trading days (floored at 5)
    #[arg(long)]
    pub window: Option<usize>,
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence.
pub fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest(args) => run_backtest(&args),
        Command::Sharpe(args) => run_sharpe(&args),
    };
    match outcome {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, TearsheetError> {
    match path {
        Some(p) => {
            info!("Loading config from {}", p.display());
            FileConfigAdapter::from_file(p)
        }
        None => Ok(FileConfigAdapter::default()),
    }
}

/// Read `[pipeline]`, falling back to defaults for absent keys.
pub fn build_pipeline_config(adapter: &dyn ConfigPort) -> Result<PipelineConfig, TearsheetError> {
    let defaults = PipelineConfig::default();

    let exec_basis = match adapter.get_string(PIPELINE, "exec_basis") {
        Some(raw) => raw
            .parse::<ExecBasis>()
            .map_err(|reason| TearsheetError::config_invalid(PIPELINE, "exec_basis", reason))?,
        None => defaults.exec_basis,
    };

    let lookback = adapter
        .get_usize(PIPELINE, "momentum_lookback")?
        .unwrap_or(DEFAULT_MOMENTUM_LOOKBACK);
    let signal = match adapter.get_string(PIPELINE, "signal") {
        Some(raw) => SignalRule::parse(&raw, lookback)
            .map_err(|reason| TearsheetError::config_invalid(PIPELINE, "signal", reason))?,
        None => defaults.signal,
    };

    let return_mode = match adapter.get_bool(PIPELINE, "use_log_returns")? {
        Some(true) => ReturnMode::Log,
        Some(false) => ReturnMode::Simple,
        None => defaults.return_mode,
    };

    Ok(PipelineConfig {
        fee_bps: adapter.get_f64(PIPELINE, "fee_bps")?.unwrap_or(defaults.fee_bps),
        return_mode,
        exec_basis,
        window: adapter.get_usize(PIPELINE, "window")?.unwrap_or(defaults.window),
        riskfree_col: adapter.get_string(PIPELINE, "riskfree_col"),
        trading_days: adapter
            .get_f64(PIPELINE, "trading_days")?
            .unwrap_or(defaults.trading_days),
        signal,
    })
}

/// Layer command-line flags over a file-derived configuration.
pub fn apply_overrides(
    mut config: PipelineConfig,
    args: &BacktestArgs,
) -> Result<PipelineConfig, TearsheetError> {
    if let Some(fee) = args.fee_bps {
        config.fee_bps = fee;
    }
    if args.use_log_returns {
        config.return_mode = ReturnMode::Log;
    } else if args.simple_returns {
        config.return_mode = ReturnMode::Simple;
    }
    if let Some(exec) = &args.exec {
        config.exec_basis = exec
            .parse()
            .map_err(|reason| TearsheetError::config_invalid(PIPELINE, "exec_basis", reason))?;
    }
    if let Some(window) = args.window {
        config.window = window;
    }
    if let Some(rf) = &args.riskfree_col {
        config.riskfree_col = Some(rf.clone());
    }

    let lookback = match (args.momentum_lookback, config.signal) {
        (Some(k), _) => k,
        (None, SignalRule::Momentum { lookback }) => lookback,
        (None, SignalRule::PrevDown) => DEFAULT_MOMENTUM_LOOKBACK,
    };
    if let Some(name) = &args.signal {
        config.signal = SignalRule::parse(name, lookback)
            .map_err(|reason| TearsheetError::config_invalid(PIPELINE, "signal", reason))?;
    } else if let SignalRule::Momentum { .. } = config.signal {
        config.signal = SignalRule::Momentum { lookback };
    }

    Ok(config)
}

/// Output paths from flags, falling back to `[output]` in the config file.
pub fn resolve_outputs(args: &OutputArgs, adapter: &dyn ConfigPort) -> OutputArgs {
    OutputArgs {
        tearsheet: args
            .tearsheet
            .clone()
            .or_else(|| adapter.get_string(OUTPUT, "tearsheet").map(PathBuf::from)),
        chart: args
            .chart
            .clone()
            .or_else(|| adapter.get_string(OUTPUT, "chart").map(PathBuf::from)),
    }
}

fn run_backtest(args: &BacktestArgs) -> Result<String, TearsheetError> {
    let adapter = load_config(args.config.as_deref())?;
    let config = apply_overrides(build_pipeline_config(&adapter)?, args)?;
    let outputs = resolve_outputs(&args.output, &adapter);
    let csv = CsvAdapter::new();
    run_backtest_pipeline(&csv, &csv, &args.csv, &config, &outputs)
}

fn run_sharpe(args: &SharpeArgs) -> Result<String, TearsheetError> {
    let adapter = load_config(args.config.as_deref())?;
    let mut config = build_pipeline_config(&adapter)?;
    if let Some(window) = args.window {
        config.window = window;
    }
    let outputs = resolve_outputs(&args.output, &adapter);
    let csv = CsvAdapter::new();
    run_sharpe_pipeline(&csv, &csv, &args.csv, &config, &outputs)
}

/// Price-series pipeline: load, compute, persist optional outputs, render.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    csv_path: &Path,
    config: &PipelineConfig,
    outputs: &OutputArgs,
) -> Result<String, TearsheetError> {
    validate_pipeline_config(config)?;
    if config.return_mode == ReturnMode::Log && config.riskfree_col.is_some() {
        warn!("subtracting a simple daily risk-free rate from log strategy returns");
    }

    info!("Loading prices from {}", csv_path.display());
    let frame = data_port.load_frame(csv_path)?;
    info!(
        rows = frame.len(),
        exec = %config.exec_basis,
        returns = %config.return_mode,
        fee_bps = config.fee_bps,
        "Running backtest"
    );

    if let Some(rf) = config.riskfree_col.as_deref().filter(|c| frame.has_column(c)) {
        let col = frame.column(rf)?;
        let missing = col.len() - col.defined_count();
        if missing > 0 {
            warn!(column = rf, missing, "empty risk-free cells treated as 0");
        }
    }

    let result = run_pipeline(&frame, config)?;
    write_outputs(report_port, &result.analysis, outputs)?;
    Ok(console_report::render_backtest(&result, config))
}

/// Returns-series pipeline: excess = strategy_return - risk_free_daily.
pub fn run_sharpe_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    csv_path: &Path,
    config: &PipelineConfig,
    outputs: &OutputArgs,
) -> Result<String, TearsheetError> {
    validate_pipeline_config(config)?;

    info!("Loading returns from {}", csv_path.display());
    let frame = data_port.load_frame(csv_path)?;
    let excess = excess_from_returns(&frame, STRATEGY_RETURN_COL, RISK_FREE_DAILY_COL)?;
    info!(
        rows = frame.len(),
        observations = excess.defined_count(),
        "Computing Sharpe statistics"
    );

    let analysis = analyze_excess(&excess, config)?;
    write_outputs(report_port, &analysis, outputs)?;
    Ok(console_report::render_returns_analysis(&analysis))
}

fn write_outputs(
    report_port: &dyn ReportPort,
    analysis: &Analysis,
    outputs: &OutputArgs,
) -> Result<(), TearsheetError> {
    if analysis.rolling_summary.available == 0 {
        warn!(
            window = analysis.rolling_summary.window,
            "not enough data for the rolling window"
        );
    }

    if let Some(path) = &outputs.tearsheet {
        report_port.write_tearsheet(&analysis.summary, path)?;
        info!("Tearsheet written to {}", path.display());
    }

    if let Some(path) = &outputs.chart {
        let svg = chart_svg::generate_rolling_sharpe_svg(&analysis.rolling);
        if svg.is_empty() {
            warn!("no rolling Sharpe points; chart not written");
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, svg)?;
            info!("Rolling Sharpe chart written to {}", path.display());
        }
    }

    Ok(())
}
