//! Chart selection validation and data handoff.
//!
//! Rendering belongs to the caller. This module only checks that a chart's
//! column selections exist and have usable types, then hands the selected
//! columns over untouched, plus the correlation matrix a heatmap consumes.

use crate::error::{Result, SweepError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Pie,
    Histogram,
    CorrelationHeatmap,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Pie => "pie",
            Self::Histogram => "histogram",
            Self::CorrelationHeatmap => "correlation_heatmap",
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A chart selection: the kind plus the column names it draws from.
///
/// Bar needs `x` and a numeric `y`; Pie and Histogram need `x` only; the
/// correlation heatmap needs no columns at all.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub x: Option<String>,
    pub y: Option<String>,
}

/// The validated data behind one chart.
#[derive(Debug)]
pub struct ChartData {
    pub kind: ChartKind,
    /// Selected columns in request order, unmodified.
    pub columns: Vec<Series>,
    /// Present only for [`ChartKind::CorrelationHeatmap`].
    pub correlation: Option<CorrelationMatrix>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub data: Vec<Vec<f64>>,
}

impl ChartRequest {
    /// Validates the request against `df` and extracts the chart data.
    pub fn resolve(&self, df: &DataFrame) -> Result<ChartData> {
        let mut columns = Vec::new();
        let mut correlation = None;

        match self.kind {
            ChartKind::Bar => {
                let x = required(self.x.as_deref(), "bar chart needs an x column")?;
                let y = required(self.y.as_deref(), "bar chart needs a y column")?;
                let x_col = selected_column(df, x)?;
                let y_col = selected_column(df, y)?;
                if !y_col.dtype().is_numeric() {
                    return Err(SweepError::Data(format!(
                        "bar chart y column '{y}' is not numeric"
                    )));
                }
                columns.push(x_col.as_materialized_series().clone());
                columns.push(y_col.as_materialized_series().clone());
            }
            ChartKind::Pie => {
                let x = required(self.x.as_deref(), "pie chart needs an x column")?;
                columns.push(selected_column(df, x)?.as_materialized_series().clone());
            }
            ChartKind::Histogram => {
                let x = required(self.x.as_deref(), "histogram needs an x column")?;
                columns.push(selected_column(df, x)?.as_materialized_series().clone());
            }
            ChartKind::CorrelationHeatmap => {
                correlation = correlation_matrix(df)?;
            }
        }

        Ok(ChartData {
            kind: self.kind,
            columns,
            correlation,
        })
    }
}

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
    value.ok_or_else(|| SweepError::Data(message.to_owned()))
}

fn selected_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| SweepError::UnknownColumn {
        column: name.to_owned(),
    })
}

/// Pearson correlation over every numeric column pair.
///
/// Returns `None` when fewer than two numeric columns exist. Integer
/// columns are cast to Float64 first so they correlate like any other
/// numeric column.
pub fn correlation_matrix(df: &DataFrame) -> Result<Option<CorrelationMatrix>> {
    let numeric: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype().is_numeric())
        .map(|c| c.name().to_string())
        .collect();

    if numeric.len() < 2 {
        return Ok(None);
    }

    let mut series = Vec::with_capacity(numeric.len());
    for name in &numeric {
        series.push(
            df.column(name)?
                .as_materialized_series()
                .cast(&DataType::Float64)?,
        );
    }

    let mut data = Vec::with_capacity(series.len());
    for i in 0..series.len() {
        let mut row = Vec::with_capacity(series.len());
        for j in 0..series.len() {
            if i == j {
                row.push(1.0);
                continue;
            }
            let corr = if let (Ok(a), Ok(b)) = (series[i].f64(), series[j].f64()) {
                polars::prelude::cov::pearson_corr(a, b)
            } else {
                None
            };
            row.push(corr.unwrap_or(0.0));
        }
        data.push(row);
    }

    Ok(Some(CorrelationMatrix {
        columns: numeric,
        data,
    }))
}
