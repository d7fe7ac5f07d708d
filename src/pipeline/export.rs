//! Serializing a table back into downloadable file bytes.

use crate::error::{Result, SweepError};
use polars::prelude::*;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Target format for [`export`].
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }
}

/// A serialized table, ready to hand to a download or a file write.
#[derive(Clone, Debug)]
pub struct ExportResult {
    pub bytes: Vec<u8>,
    /// Source base name with the extension swapped for the target's.
    pub file_name: String,
    pub mime_type: &'static str,
}

/// Serializes a table into `format`, deriving the output file name from
/// `source_name`.
pub fn export(df: &DataFrame, source_name: &str, format: ExportFormat) -> Result<ExportResult> {
    let bytes = match format {
        ExportFormat::Csv => write_csv(df)?,
        ExportFormat::Xlsx => write_xlsx(df)?,
    };
    Ok(ExportResult {
        bytes,
        file_name: target_file_name(source_name, format),
        mime_type: format.mime_type(),
    })
}

fn target_file_name(source_name: &str, format: ExportFormat) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("export");
    format!("{stem}.{}", format.extension())
}

fn write_csv(df: &DataFrame) -> Result<Vec<u8>> {
    let mut df = df.clone();
    let mut buf = Vec::new();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| SweepError::Serialization(e.to_string()))?;
    Ok(buf)
}

/// One worksheet, header row first, no index column. Numeric, boolean and
/// text cells are written natively; temporal cells as their display
/// string; nulls are left blank.
fn write_xlsx(df: &DataFrame) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (c, column) in df.get_columns().iter().enumerate() {
        let col_idx = u16::try_from(c).map_err(|_| {
            SweepError::Serialization(format!(
                "column {c} exceeds the XLSX column limit"
            ))
        })?;
        sheet.write_string(0, col_idx, column.name().as_str())?;
        write_cells(sheet, col_idx, column)?;
    }
    Ok(workbook.save_to_buffer()?)
}

fn write_cells(sheet: &mut Worksheet, col_idx: u16, column: &Column) -> Result<()> {
    let series = column.as_materialized_series();
    match series.dtype() {
        dt if dt.is_numeric() => {
            let values = series.cast(&DataType::Float64)?;
            for (r, v) in values.f64()?.into_iter().enumerate() {
                if let Some(v) = v {
                    sheet.write_number((r + 1) as u32, col_idx, v)?;
                }
            }
        }
        DataType::Boolean => {
            for (r, v) in series.bool()?.into_iter().enumerate() {
                if let Some(v) = v {
                    sheet.write_boolean((r + 1) as u32, col_idx, v)?;
                }
            }
        }
        DataType::String => {
            for (r, v) in series.str()?.into_iter().enumerate() {
                if let Some(v) = v {
                    sheet.write_string((r + 1) as u32, col_idx, v)?;
                }
            }
        }
        dt if dt.is_temporal() => {
            let values = series.cast(&DataType::String)?;
            for (r, v) in values.str()?.into_iter().enumerate() {
                if let Some(v) = v {
                    sheet.write_string((r + 1) as u32, col_idx, v)?;
                }
            }
        }
        other => {
            return Err(SweepError::Serialization(format!(
                "column '{}' has type {other} which XLSX export does not support",
                column.name()
            )));
        }
    }
    Ok(())
}
