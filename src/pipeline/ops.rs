//! Cleaning operations over a dataframe.
//!
//! Every operation is pure: it takes a dataframe and returns a new one,
//! leaving the input untouched. Operations serialize to JSON so a cleaning
//! recipe can be saved and replayed through [`OpPipeline`].

use crate::error::{Result, SweepError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Default z-score threshold for [`CleaningOp::RemoveOutliers`].
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 3.0;

fn default_threshold() -> f64 {
    DEFAULT_OUTLIER_THRESHOLD
}

/// A single cleaning step.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CleaningOp {
    /// Drop exact duplicate rows, keeping the first occurrence.
    RemoveDuplicates,
    /// Fill nulls in numeric columns with the column mean.
    FillMissingNumeric,
    /// Drop rows where any numeric column sits more than
    /// `threshold_sigma` standard deviations from its mean.
    RemoveOutliers {
        #[serde(default = "default_threshold")]
        threshold_sigma: f64,
    },
    /// Re-type one column as Float64, nulling values that do not parse.
    CoerceToNumeric { column: String },
}

impl CleaningOp {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RemoveDuplicates => "remove_duplicates",
            Self::FillMissingNumeric => "fill_missing_numeric",
            Self::RemoveOutliers { .. } => "remove_outliers",
            Self::CoerceToNumeric { .. } => "coerce_to_numeric",
        }
    }
}

/// Applies one cleaning step to a dataframe.
pub fn apply(df: &DataFrame, op: &CleaningOp) -> Result<DataFrame> {
    match op {
        CleaningOp::RemoveDuplicates => remove_duplicates(df),
        CleaningOp::FillMissingNumeric => fill_missing_numeric(df),
        CleaningOp::RemoveOutliers { threshold_sigma } => {
            remove_outliers(df, *threshold_sigma)
        }
        CleaningOp::CoerceToNumeric { column } => coerce_to_numeric(df, column),
    }
}

/// Drops exact duplicate rows across all columns, keeping the first
/// occurrence and preserving row order.
pub fn remove_duplicates(df: &DataFrame) -> Result<DataFrame> {
    Ok(df.unique_stable(None, UniqueKeepStrategy::First, None)?)
}

/// Fills nulls in numeric columns with the column mean.
///
/// Columns that are entirely null have no mean and are left alone, as are
/// columns with nothing missing. Integer columns widen to Float64 when
/// the mean is not a whole number, matching what the fill produces.
pub fn fill_missing_numeric(df: &DataFrame) -> Result<DataFrame> {
    let mut exprs = Vec::new();
    for column in df.get_columns() {
        let null_count = column.null_count();
        if !column.dtype().is_numeric() || null_count == 0 || null_count == column.len() {
            continue;
        }
        let e = col(column.name().clone());
        exprs.push(e.clone().fill_null(e.mean()));
    }
    if exprs.is_empty() {
        return Ok(df.clone());
    }
    Ok(df.clone().lazy().with_columns(exprs).collect()?)
}

/// Drops rows holding a numeric value more than `threshold_sigma` standard
/// deviations from the column mean (sample std, ddof = 1).
///
/// Columns whose std is zero or undefined exert no constraint. A null in a
/// constrained column fails the check and drops the row. Filtering shifts
/// the surviving mean and std, so a second pass can drop further rows.
pub fn remove_outliers(df: &DataFrame, threshold_sigma: f64) -> Result<DataFrame> {
    let mut predicate: Option<Expr> = None;
    for column in df.get_columns() {
        if !column.dtype().is_numeric() {
            continue;
        }
        let values = column.as_materialized_series().cast(&DataType::Float64)?;
        let ca = values.f64()?;
        let (Some(mean), Some(std)) = (ca.mean(), ca.std(1)) else {
            continue;
        };
        if std == 0.0 {
            continue;
        }

        let z = (col(column.name().clone()) - lit(mean)) / lit(std);
        let within = z.abs().lt(lit(threshold_sigma));
        predicate = Some(match predicate {
            Some(p) => p.and(within),
            None => within,
        });
    }

    match predicate {
        Some(p) => Ok(df.clone().lazy().filter(p).collect()?),
        None => Ok(df.clone()),
    }
}

/// Re-types one column as Float64. The cast is permissive: values that do
/// not parse become null rather than failing the operation.
pub fn coerce_to_numeric(df: &DataFrame, column: &str) -> Result<DataFrame> {
    let Ok(target) = df.column(column) else {
        return Err(SweepError::UnknownColumn {
            column: column.to_owned(),
        });
    };
    let casted = target.as_materialized_series().cast(&DataType::Float64)?;

    let mut out = df.clone();
    out.replace(column, casted)?;
    Ok(out)
}

/// An ordered list of cleaning steps that can be saved to JSON and
/// replayed against any table.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct OpPipeline {
    ops: Vec<CleaningOp>,
}

impl OpPipeline {
    pub fn new(ops: Vec<CleaningOp>) -> Self {
        Self { ops }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add(&mut self, op: CleaningOp) {
        self.ops.push(op);
    }

    /// Runs every step in order, feeding each the previous step's output.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut out = df.clone();
        for op in &self.ops {
            out = apply(&out, op)?;
        }
        Ok(out)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CleaningOp> {
        self.ops.iter()
    }
}
