//! Read-only reports derived from a table.

use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;

/// Default number of rows shown by [`preview`].
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Returns the first `n` rows as a detached frame.
///
/// An empty table yields an empty preview, never an error.
pub fn preview(df: &DataFrame, n: usize) -> DataFrame {
    df.head(Some(n))
}

/// Descriptive statistics for one numeric column.
///
/// Quantiles use linear interpolation; the standard deviation is the
/// sample deviation (ddof = 1). Statistics that are undefined for the
/// column's data (no present values, or a single value for `std_dev`)
/// are `None`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    /// Non-null cell count.
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

/// Summarizes every numeric column, in table column order.
///
/// A table with no numeric columns gives an empty vec.
pub fn summarize(df: &DataFrame) -> Result<Vec<NumericSummary>> {
    let mut summaries = Vec::new();
    for column in df.get_columns() {
        if !column.dtype().is_numeric() {
            continue;
        }
        let values = column.as_materialized_series().cast(&DataType::Float64)?;
        let ca = values.f64()?;
        summaries.push(NumericSummary {
            column: column.name().to_string(),
            count: ca.len() - ca.null_count(),
            mean: ca.mean(),
            std_dev: ca.std(1),
            min: ca.min(),
            q1: ca.quantile(0.25, QuantileMethod::Linear)?,
            median: ca.median(),
            q3: ca.quantile(0.75, QuantileMethod::Linear)?,
            max: ca.max(),
        });
    }
    Ok(summaries)
}

/// One column with at least one absent cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MissingEntry {
    pub column: String,
    pub null_count: usize,
}

/// Lists columns holding at least one null, in table column order.
pub fn missing_report(df: &DataFrame) -> Vec<MissingEntry> {
    df.get_columns()
        .iter()
        .filter(|c| c.null_count() > 0)
        .map(|c| MissingEntry {
            column: c.name().to_string(),
            null_count: c.null_count(),
        })
        .collect()
}
