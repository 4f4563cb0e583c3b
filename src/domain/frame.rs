//! Column-addressable input table, one row per date.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::error::TearsheetError;
use super::series::TimeSeries;

#[derive(Debug, Clone)]
pub struct Frame {
    dates: Arc<[NaiveDate]>,
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl Frame {
    pub fn new(
        dates: Vec<NaiveDate>,
        columns: BTreeMap<String, Vec<Option<f64>>>,
    ) -> Result<Self, TearsheetError> {
        // Validates the index once; every column then shares it.
        let index = TimeSeries::<f64>::new(dates.clone(), vec![None; dates.len()])?.index();
        if let Some((name, col)) = columns.iter().find(|(_, c)| c.len() != index.len()) {
            return Err(TearsheetError::schema(format!(
                "column '{}' has {} values for {} dates",
                name,
                col.len(),
                index.len()
            )));
        }
        Ok(Self {
            dates: index,
            columns,
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Result<TimeSeries<f64>, TearsheetError> {
        let values = self.columns.get(name).ok_or_else(|| {
            TearsheetError::schema(format!("required column '{name}' is missing"))
        })?;
        Ok(TimeSeries::with_index(Arc::clone(&self.dates), values.clone()))
    }

    /// Fail with a schema error naming every absent column.
    pub fn require(&self, names: &[&str]) -> Result<(), TearsheetError> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| !self.has_column(n))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(TearsheetError::schema(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )))
        }
    }
}
