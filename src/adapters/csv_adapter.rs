//! CSV data and tearsheet adapter.
//!
//! Input files carry a header row with a `date` column (YYYY-MM-DD) and any
//! number of numeric columns. Empty cells load as undefined values. Columns
//! without a single number are left out of the frame; a malformed cell in a
//! numeric column is an error.

use crate::domain::error::TearsheetError;
use crate::domain::frame::Frame;
use crate::domain::metrics::MetricsSummary;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const DATE_COLUMN: &str = "date";

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvAdapter;

impl CsvAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_frame(&self, content: &str) -> Result<Frame, TearsheetError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let date_idx = headers
            .iter()
            .position(|h| h == DATE_COLUMN)
            .ok_or_else(|| TearsheetError::schema("required column 'date' is missing"))?;

        let mut rows: Vec<(NaiveDate, Vec<String>)> = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result?;
            let raw_date = record.get(date_idx).unwrap_or_default();
            let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|e| {
                TearsheetError::Csv {
                    reason: format!("row {}: invalid date '{}': {}", line + 1, raw_date, e),
                }
            })?;
            rows.push((date, record.iter().map(|f| f.to_string()).collect()));
        }

        rows.sort_by_key(|(date, _)| *date);
        if let Some(w) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(TearsheetError::Csv {
                reason: format!("duplicate date {}", w[0].0),
            });
        }

        let mut columns = BTreeMap::new();
        for (idx, name) in headers.iter().enumerate() {
            if idx == date_idx {
                continue;
            }
            match parse_column(&rows, name, idx)? {
                Some(values) => {
                    columns.insert(name.clone(), values);
                }
                None => {
                    warn!(column = %name, "skipping non-numeric column");
                }
            }
        }

        let dates = rows.into_iter().map(|(date, _)| date).collect();
        Frame::new(dates, columns)
    }
}

fn is_blank(raw: &str) -> bool {
    raw.is_empty() || raw.eq_ignore_ascii_case("nan")
}

/// `None` for a text column with no numeric cell at all. A column that holds
/// numbers is numeric, and any other non-empty cell in it is an error.
fn parse_column(
    rows: &[(NaiveDate, Vec<String>)],
    name: &str,
    idx: usize,
) -> Result<Option<Vec<Option<f64>>>, TearsheetError> {
    let cells: Vec<(NaiveDate, &str, Option<f64>)> = rows
        .iter()
        .map(|(date, fields)| {
            let raw = fields.get(idx).map(String::as_str).unwrap_or_default();
            let value = if is_blank(raw) {
                None
            } else {
                raw.parse::<f64>().ok()
            };
            (*date, raw, value)
        })
        .collect();

    if !cells.iter().any(|(_, _, v)| v.is_some()) {
        let has_text = cells
            .iter()
            .any(|(_, raw, _)| !is_blank(raw));
        return Ok(if has_text {
            None
        } else {
            Some(vec![None; cells.len()])
        });
    }

    cells
        .into_iter()
        .map(|(date, raw, value)| match value {
            Some(v) => Ok(Some(v)),
            None if is_blank(raw) => Ok(None),
            None => Err(TearsheetError::Csv {
                reason: format!("column '{name}' on {date}: invalid number '{raw}'"),
            }),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

impl DataPort for CsvAdapter {
    fn load_frame(&self, source: &Path) -> Result<Frame, TearsheetError> {
        let content = fs::read_to_string(source).map_err(|e| {
            TearsheetError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to read {}: {}", source.display(), e),
            ))
        })?;
        let frame = self.parse_frame(&content)?;
        debug!(
            path = %source.display(),
            rows = frame.len(),
            columns = ?frame.column_names().collect::<Vec<_>>(),
            "loaded frame"
        );
        Ok(frame)
    }
}

/// One tearsheet row. Undefined metrics are written as `nan`.
#[derive(Debug, Serialize)]
struct TearsheetRow {
    n: usize,
    mean_daily_excess: String,
    std_daily_excess: String,
    downside_std_daily: String,
    vol_annualized: String,
    sharpe_annualized: String,
    sortino_annualized: String,
    max_drawdown: String,
    hit_rate: String,
    cumulative_return: String,
    t_stat: String,
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "nan".to_string(), |v| v.to_string())
}

impl From<&MetricsSummary> for TearsheetRow {
    fn from(m: &MetricsSummary) -> Self {
        TearsheetRow {
            n: m.count,
            mean_daily_excess: cell(m.mean),
            std_daily_excess: cell(m.std),
            downside_std_daily: cell(m.downside_std),
            vol_annualized: cell(m.vol_annualized),
            sharpe_annualized: cell(m.sharpe_annualized),
            sortino_annualized: cell(m.sortino_annualized),
            max_drawdown: cell(m.max_drawdown),
            hit_rate: cell(m.hit_rate),
            cumulative_return: cell(m.cumulative_return),
            t_stat: cell(m.t_stat),
        }
    }
}

impl ReportPort for CsvAdapter {
    fn write_tearsheet(
        &self,
        summary: &MetricsSummary,
        output_path: &Path,
    ) -> Result<(), TearsheetError> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut wtr = csv::Writer::from_path(output_path)?;
        wtr.serialize(TearsheetRow::from(summary))?;
        wtr.flush()?;
        Ok(())
    }
}
