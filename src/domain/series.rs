//! Date-indexed series shared by every pipeline stage.
//!
//! A `TimeSeries<T>` pairs a strictly increasing date index with one optional
//! value per date. `None` marks a value that is undefined at that point, such
//! as the first return of a price series.
//!
//! Derived series share the index of their source through an `Arc`, so
//! stages can be composed without copying dates.

use chrono::NaiveDate;
use std::sync::Arc;

use super::error::TearsheetError;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T> {
    dates: Arc<[NaiveDate]>,
    values: Vec<Option<T>>,
}

impl<T: Copy> TimeSeries<T> {
    /// Build a series, rejecting mismatched lengths and non-increasing dates.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<Option<T>>) -> Result<Self, TearsheetError> {
        if dates.len() != values.len() {
            return Err(TearsheetError::schema(format!(
                "series has {} dates but {} values",
                dates.len(),
                values.len()
            )));
        }
        if let Some(w) = dates.windows(2).find(|w| w[1] <= w[0]) {
            return Err(TearsheetError::schema(format!(
                "dates must be strictly increasing: {} is followed by {}",
                w[0], w[1]
            )));
        }
        Ok(Self {
            dates: dates.into(),
            values,
        })
    }

    /// Build a series where every value is defined.
    pub fn from_values(dates: Vec<NaiveDate>, values: Vec<T>) -> Result<Self, TearsheetError> {
        Self::new(dates, values.into_iter().map(Some).collect())
    }

    /// A new series on the same index. Lengths must match.
    pub(crate) fn with_values<U: Copy>(&self, values: Vec<Option<U>>) -> TimeSeries<U> {
        debug_assert_eq!(self.dates.len(), values.len());
        TimeSeries {
            dates: Arc::clone(&self.dates),
            values,
        }
    }

    pub(crate) fn with_index(dates: Arc<[NaiveDate]>, values: Vec<Option<T>>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        Self { dates, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[Option<T>] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.values.get(index).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Option<T>)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Values with undefined entries removed, in order.
    pub fn defined(&self) -> Vec<T> {
        self.values.iter().flatten().copied().collect()
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Last defined value, if any.
    pub fn last_defined(&self) -> Option<T> {
        self.values.iter().rev().find_map(|v| *v)
    }

    /// True when both series cover exactly the same dates.
    pub fn same_index<U>(&self, other: &TimeSeries<U>) -> bool {
        Arc::ptr_eq(&self.dates, &other.dates) || self.dates[..] == other.dates[..]
    }

    pub(crate) fn index(&self) -> Arc<[NaiveDate]> {
        Arc::clone(&self.dates)
    }
}
