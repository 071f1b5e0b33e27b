use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

/// A spreadsheet cell reduced to the three shapes aggregation cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Failed to parse spreadsheet '{file}': {reason}")]
    Parse { file: String, reason: String },

    #[error("Column '{column}' not found in '{file}'")]
    UnknownColumn { column: String, file: String },

    #[error("Worksheet in '{file}' has a header row but no data rows")]
    EmptyWorksheet { file: String },

    #[error("Sum of column '{column}' in '{file}' is too large to represent")]
    Overflow { column: String, file: String },

    #[error("Invalid column request: {0}")]
    InvalidRequest(String),
}

impl SummaryError {
    pub(crate) fn parse(file: &str, reason: impl ToString) -> Self {
        SummaryError::Parse {
            file: file.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Requested column names, trimmed and deduplicated case-insensitively.
/// The first spelling of a name keeps its position.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRequest {
    names: Vec<String>,
}

impl ColumnRequest {
    pub fn new<I, S>(names: I) -> Result<Self, SummaryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();

        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(SummaryError::InvalidRequest(
                    "column names must be non-empty".to_string(),
                ));
            }
            if seen.insert(name.to_lowercase()) {
                kept.push(name.to_string());
            }
        }

        if kept.is_empty() {
            return Err(SummaryError::InvalidRequest(
                "at least one column name must be provided".to_string(),
            ));
        }

        Ok(Self { names: kept })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub sum: f64,
    pub avg: f64,
    /// Number of cells that contributed to `sum`.
    #[serde(skip)]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub file: String,
    pub summary: Vec<ColumnSummary>,
}

/// Running total for one column.
#[derive(Debug, Default, Clone, Copy)]
pub struct ColumnAccumulator {
    sum: f64,
    count: usize,
}

impl ColumnAccumulator {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Fails when the running total left the range of `f64`.
    pub fn finish(self, column: &str, file: &str) -> Result<ColumnSummary, SummaryError> {
        if !self.sum.is_finite() {
            return Err(SummaryError::Overflow {
                column: column.to_string(),
                file: file.to_string(),
            });
        }

        let avg = if self.count > 0 {
            self.sum / self.count as f64
        } else {
            0.0
        };

        Ok(ColumnSummary {
            column: column.to_string(),
            sum: self.sum,
            avg,
            count: self.count,
        })
    }
}
