//! CLI integration tests for configuration layering and command orchestration.
//!
//! Tests cover:
//! - Config parsing (build_pipeline_config) from INI text and files on disk
//! - Flag overrides layered over file values (apply_overrides)
//! - Output path resolution (resolve_outputs)
//! - Backtest and Sharpe pipelines through mock and CSV ports
//! - Tearsheet and chart files written to disk

mod common;

use common::*;
use std::fs;
use std::path::PathBuf;
use tearsheet::adapters::csv_adapter::CsvAdapter;
use tearsheet::adapters::file_config_adapter::FileConfigAdapter;
use tearsheet::cli::{self, BacktestArgs, OutputArgs};
use tearsheet::domain::config::{ExecBasis, PipelineConfig, SignalRule};
use tearsheet::domain::error::TearsheetError;
use tearsheet::domain::returns::ReturnMode;

const VALID_INI: &str = r#"
[pipeline]
fee_bps = 2.5
use_log_returns = true
exec_basis = open
window = 30
riskfree_col = rf_daily
trading_days = 260
signal = momentum
momentum_lookback = 10

[output]
tearsheet = out/tearsheet.csv
chart = out/rolling.svg
"#;

mod config_loading {
    use super::*;

    #[test]
    fn build_pipeline_config_valid_full() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let config = cli::build_pipeline_config(&adapter).unwrap();

        assert!((config.fee_bps - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.return_mode, ReturnMode::Log);
        assert_eq!(config.exec_basis, ExecBasis::Open);
        assert_eq!(config.window, 30);
        assert_eq!(config.riskfree_col.as_deref(), Some("rf_daily"));
        assert!((config.trading_days - 260.0).abs() < f64::EPSILON);
        assert_eq!(config.signal, SignalRule::Momentum { lookback: 10 });
    }

    #[test]
    fn build_pipeline_config_uses_defaults() {
        let adapter = FileConfigAdapter::from_string("[pipeline]\n").unwrap();
        let config = cli::build_pipeline_config(&adapter).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn momentum_without_lookback_uses_default() {
        let adapter = FileConfigAdapter::from_string("[pipeline]\nsignal = momentum\n").unwrap();
        let config = cli::build_pipeline_config(&adapter).unwrap();
        assert_eq!(config.signal, SignalRule::Momentum { lookback: 20 });
    }

    #[test]
    fn invalid_exec_basis_is_config_error() {
        let adapter = FileConfigAdapter::from_string("[pipeline]\nexec_basis = vwap\n").unwrap();
        let err = cli::build_pipeline_config(&adapter).unwrap_err();
        assert!(matches!(err, TearsheetError::ConfigInvalid { ref key, .. } if key == "exec_basis"));
    }

    #[test]
    fn unknown_signal_is_config_error() {
        let adapter = FileConfigAdapter::from_string("[pipeline]\nsignal = coin_flip\n").unwrap();
        let err = cli::build_pipeline_config(&adapter).unwrap_err();
        assert!(matches!(err, TearsheetError::ConfigInvalid { ref key, .. } if key == "signal"));
    }

    #[test]
    fn malformed_number_is_config_error() {
        let adapter = FileConfigAdapter::from_string("[pipeline]\nwindow = sixty\n").unwrap();
        assert!(matches!(
            cli::build_pipeline_config(&adapter).unwrap_err(),
            TearsheetError::ConfigInvalid { .. }
        ));
    }

    #[test]
    fn load_config_from_disk() {
        let file = write_temp_file(VALID_INI);
        let adapter = cli::load_config(Some(file.path())).unwrap();
        let config = cli::build_pipeline_config(&adapter).unwrap();
        assert_eq!(config.window, 30);
    }

    #[test]
    fn load_config_without_path_is_empty() {
        let adapter = cli::load_config(None).unwrap();
        let config = cli::build_pipeline_config(&adapter).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn load_config_missing_file_is_parse_error() {
        let err = cli::load_config(Some(PathBuf::from("/nonexistent/t.ini").as_path())).unwrap_err();
        assert!(matches!(err, TearsheetError::ConfigParse { .. }));
    }
}

mod overrides {
    use super::*;

    fn base() -> PipelineConfig {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        cli::build_pipeline_config(&adapter).unwrap()
    }

    #[test]
    fn no_flags_keep_file_values() {
        let config = cli::apply_overrides(base(), &BacktestArgs::default()).unwrap();
        assert_eq!(config, base());
    }

    #[test]
    fn flags_take_precedence() {
        let args = BacktestArgs {
            fee_bps: Some(0.0),
            exec: Some("close".into()),
            window: Some(90),
            riskfree_col: Some("tbill".into()),
            signal: Some("prev_down".into()),
            ..BacktestArgs::default()
        };
        let config = cli::apply_overrides(base(), &args).unwrap();
        assert_eq!(config.fee_bps, 0.0);
        assert_eq!(config.exec_basis, ExecBasis::Close);
        assert_eq!(config.window, 90);
        assert_eq!(config.riskfree_col.as_deref(), Some("tbill"));
        assert_eq!(config.signal, SignalRule::PrevDown);
        assert_eq!(config.return_mode, ReturnMode::Log);
    }

    #[test]
    fn lookback_flag_adjusts_momentum_from_file() {
        let args = BacktestArgs {
            momentum_lookback: Some(5),
            ..BacktestArgs::default()
        };
        let config = cli::apply_overrides(base(), &args).unwrap();
        assert_eq!(config.signal, SignalRule::Momentum { lookback: 5 });
    }

    #[test]
    fn log_returns_flag_switches_mode() {
        let args = BacktestArgs {
            use_log_returns: true,
            ..BacktestArgs::default()
        };
        let config = cli::apply_overrides(PipelineConfig::default(), &args).unwrap();
        assert_eq!(config.return_mode, ReturnMode::Log);
    }

    #[test]
    fn simple_returns_flag_overrides_log_mode_from_file() {
        assert_eq!(base().return_mode, ReturnMode::Log);
        let args = BacktestArgs {
            simple_returns: true,
            ..BacktestArgs::default()
        };
        let config = cli::apply_overrides(base(), &args).unwrap();
        assert_eq!(config.return_mode, ReturnMode::Simple);
    }

    #[test]
    fn resolve_outputs_falls_back_to_file() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let flags = OutputArgs {
            tearsheet: Some(PathBuf::from("flag.csv")),
            chart: None,
        };
        let outputs = cli::resolve_outputs(&flags, &adapter);
        assert_eq!(outputs.tearsheet, Some(PathBuf::from("flag.csv")));
        assert_eq!(outputs.chart, Some(PathBuf::from("out/rolling.svg")));
    }
}

mod pipelines {
    use super::*;

    #[test]
    fn backtest_with_mock_ports_records_tearsheet() {
        let data = MockDataPort::new().with_frame("prices.csv", close_frame(&generate_closes(80, 100.0)));
        let reports = RecordingReportPort::default();
        let outputs = OutputArgs {
            tearsheet: Some(PathBuf::from("t.csv")),
            chart: None,
        };

        let text = cli::run_backtest_pipeline(
            &data,
            &reports,
            PathBuf::from("prices.csv").as_path(),
            &PipelineConfig::default(),
            &outputs,
        )
        .unwrap();

        assert!(text.contains("Backtest Summary"));
        assert!(text.contains("Observations (n):      80"));
        let written = reports.written.borrow();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0.count, 80);
        assert_eq!(written[0].1, PathBuf::from("t.csv"));
    }

    #[test]
    fn backtest_rejects_invalid_config_before_loading() {
        let data = MockDataPort::new();
        let reports = RecordingReportPort::default();
        let config = PipelineConfig {
            fee_bps: -1.0,
            ..PipelineConfig::default()
        };
        let err = cli::run_backtest_pipeline(
            &data,
            &reports,
            PathBuf::from("missing.csv").as_path(),
            &config,
            &OutputArgs::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TearsheetError::ConfigInvalid { .. }));
    }

    #[test]
    fn backtest_missing_riskfree_column_fails() {
        let data = MockDataPort::new().with_frame("p.csv", close_frame(&[1.0, 2.0, 3.0]));
        let reports = RecordingReportPort::default();
        let config = PipelineConfig {
            riskfree_col: Some("rf".into()),
            ..PipelineConfig::default()
        };
        let err = cli::run_backtest_pipeline(
            &data,
            &reports,
            PathBuf::from("p.csv").as_path(),
            &config,
            &OutputArgs::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TearsheetError::Schema { .. }));
        assert!(reports.written.borrow().is_empty());
    }

    #[test]
    fn backtest_writes_tearsheet_and_chart_to_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let prices = dir.path().join("prices.csv");
        fs::write(&prices, prices_csv(&generate_closes(90, 100.0))).unwrap();
        let outputs = OutputArgs {
            tearsheet: Some(dir.path().join("out").join("tearsheet.csv")),
            chart: Some(dir.path().join("out").join("rolling.svg")),
        };
        let config = PipelineConfig {
            window: 20,
            ..PipelineConfig::default()
        };
        let csv = CsvAdapter::new();

        let text = cli::run_backtest_pipeline(&csv, &csv, &prices, &config, &outputs).unwrap();

        assert!(text.contains("window=20"));
        let sheet = fs::read_to_string(outputs.tearsheet.as_ref().unwrap()).unwrap();
        assert!(sheet.starts_with("n,"));
        let svg = fs::read_to_string(outputs.chart.as_ref().unwrap()).unwrap();
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn chart_skipped_when_no_rolling_points() {
        let dir = tempfile::TempDir::new().unwrap();
        let prices = dir.path().join("prices.csv");
        fs::write(&prices, prices_csv(&[100.0, 101.0, 99.0])).unwrap();
        let chart = dir.path().join("rolling.svg");
        let outputs = OutputArgs {
            tearsheet: None,
            chart: Some(chart.clone()),
        };
        let csv = CsvAdapter::new();

        cli::run_backtest_pipeline(&csv, &csv, &prices, &PipelineConfig::default(), &outputs)
            .unwrap();

        assert!(!chart.exists());
    }

    #[test]
    fn sharpe_pipeline_over_returns_csv() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("returns.csv");
        let strategy: Vec<f64> = (0..40).map(|i| ((i as f64) * 0.9).sin() * 0.01).collect();
        fs::write(&path, returns_csv(&strategy, 0.0001)).unwrap();
        let config = PipelineConfig {
            window: 10,
            ..PipelineConfig::default()
        };
        let csv = CsvAdapter::new();

        let text =
            cli::run_sharpe_pipeline(&csv, &csv, &path, &config, &OutputArgs::default()).unwrap();

        assert!(text.contains("Sharpe Summary"));
        assert!(text.contains("Observations (n):      40"));
        assert!(text.contains("window=10: 31 points"));
    }

    #[test]
    fn sharpe_pipeline_requires_columns() {
        let data = MockDataPort::new().with_frame("r.csv", close_frame(&[1.0, 2.0]));
        let reports = RecordingReportPort::default();
        let err = cli::run_sharpe_pipeline(
            &data,
            &reports,
            PathBuf::from("r.csv").as_path(),
            &PipelineConfig::default(),
            &OutputArgs::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TearsheetError::Schema { .. }));
    }
}
