#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use tearsheet::domain::error::TearsheetError;
use tearsheet::domain::frame::Frame;
use tearsheet::domain::metrics::MetricsSummary;
use tearsheet::ports::data_port::DataPort;
use tearsheet::ports::report_port::ReportPort;

/// Serves frames keyed by path without touching the filesystem.
pub struct MockDataPort {
    pub frames: HashMap<PathBuf, Frame>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            frames: HashMap::new(),
        }
    }

    pub fn with_frame(mut self, path: &str, frame: Frame) -> Self {
        self.frames.insert(PathBuf::from(path), frame);
        self
    }
}

impl DataPort for MockDataPort {
    fn load_frame(&self, source: &Path) -> Result<Frame, TearsheetError> {
        self.frames.get(source).cloned().ok_or_else(|| {
            TearsheetError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no frame for {}", source.display()),
            ))
        })
    }
}

/// Records every tearsheet it is asked to write.
#[derive(Default)]
pub struct RecordingReportPort {
    pub written: RefCell<Vec<(MetricsSummary, PathBuf)>>,
}

impl ReportPort for RecordingReportPort {
    fn write_tearsheet(
        &self,
        summary: &MetricsSummary,
        output_path: &Path,
    ) -> Result<(), TearsheetError> {
        self.written
            .borrow_mut()
            .push((summary.clone(), output_path.to_path_buf()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn consecutive_dates(n: usize) -> Vec<NaiveDate> {
    (0..n)
        .map(|i| date(2024, 1, 1) + chrono::Duration::days(i as i64))
        .collect()
}

pub fn make_frame(cols: &[(&str, Vec<Option<f64>>)]) -> Frame {
    let n = cols.first().map(|(_, v)| v.len()).unwrap_or(0);
    let columns: BTreeMap<String, Vec<Option<f64>>> = cols
        .iter()
        .map(|(name, v)| (name.to_string(), v.clone()))
        .collect();
    Frame::new(consecutive_dates(n), columns).unwrap()
}

pub fn close_frame(closes: &[f64]) -> Frame {
    make_frame(&[("close", closes.iter().copied().map(Some).collect())])
}

/// Deterministic zig-zag walk around `start`.
pub fn generate_closes(count: usize, start: f64) -> Vec<f64> {
    (0..count)
        .map(|i| start + (i as f64 * 0.7).sin() * 3.0 + i as f64 * 0.05)
        .collect()
}

/// `date,close` CSV text for `closes` starting 2024-01-01.
pub fn prices_csv(closes: &[f64]) -> String {
    let mut out = String::from("date,close\n");
    for (d, c) in consecutive_dates(closes.len()).iter().zip(closes) {
        out.push_str(&format!("{},{}\n", d.format("%Y-%m-%d"), c));
    }
    out
}

/// `date,strategy_return,risk_free_daily` CSV text.
pub fn returns_csv(strategy: &[f64], riskfree: f64) -> String {
    let mut out = String::from("date,strategy_return,risk_free_daily\n");
    for (d, r) in consecutive_dates(strategy.len()).iter().zip(strategy) {
        out.push_str(&format!("{},{},{}\n", d.format("%Y-%m-%d"), r, riskfree));
    }
    out
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
