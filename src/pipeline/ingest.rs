//! Parsing uploads into dataframes.
//!
//! The parser is chosen from the file-name extension alone, so an
//! unsupported extension is rejected before any content is read. CSV goes
//! through the Polars reader with schema inference; XLSX goes through
//! calamine with a per-column type election (numeric, boolean, otherwise
//! text). Both paths finish with a pass that re-types string columns that
//! are mostly parseable as datetimes.

use crate::error::{Result, SweepError};
use crate::pipeline::types::UploadedFile;
use calamine::{Data, DataType as _, Reader as _, Xlsx};
use polars::prelude::*;
use std::io::Cursor;

const EMPTY_CELL: Data = Data::Empty;

/// Parses an upload into a dataframe.
///
/// The first row is always treated as the header row.
pub fn ingest(file: &UploadedFile) -> Result<DataFrame> {
    let ext = file.extension();
    match ext.as_str() {
        "csv" => read_csv(file),
        "xlsx" => read_xlsx(file),
        _ => Err(SweepError::UnsupportedFormat {
            file_name: file.name().to_owned(),
            extension: ext,
        }),
    }
}

fn parse_error(file: &UploadedFile, message: impl Into<String>) -> SweepError {
    SweepError::Parse {
        file_name: file.name().to_owned(),
        message: message.into(),
    }
}

fn read_csv(file: &UploadedFile) -> Result<DataFrame> {
    let cursor = Cursor::new(file.content().to_vec());
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10_000))
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
        .into_reader_with_file_handle(cursor)
        .finish()
        .map_err(|e| parse_error(file, e.to_string()))?;

    retype_temporal_columns(df)
}

fn read_xlsx(file: &UploadedFile) -> Result<DataFrame> {
    let cursor = Cursor::new(file.content().to_vec());
    let mut workbook =
        Xlsx::new(cursor).map_err(|e| parse_error(file, e.to_string()))?;

    // First worksheet only.
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| parse_error(file, "workbook has no worksheets"))?
        .map_err(|e| parse_error(file, e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(parse_error(file, "worksheet has no header row"));
    };
    let headers = header_names(header_row);
    let data_rows: Vec<&[Data]> = rows.collect();

    let mut columns = Vec::with_capacity(headers.len());
    for (c, name) in headers.iter().enumerate() {
        columns.push(Column::from(elect_column(name, c, &data_rows)));
    }

    let df = DataFrame::new(columns)?;
    retype_temporal_columns(df)
}

/// Header cells become column names; empty or duplicate cells get a
/// positional fallback so names stay usable as keys.
fn header_names(header_row: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(header_row.len());
    for (i, cell) in header_row.iter().enumerate() {
        let mut name = match cell {
            Data::Empty => String::new(),
            Data::String(s) => s.trim().to_owned(),
            other => other.to_string(),
        };
        if name.is_empty() {
            name = format!("column_{i}");
        }
        if names.contains(&name) {
            name = format!("{name}_{i}");
        }
        names.push(name);
    }
    names
}

/// Builds one series from the cells at column index `c`, electing the
/// narrowest type that fits every present cell: all numeric cells give
/// Float64, all booleans give Boolean, anything mixed falls back to text.
/// A column with no present cells at all becomes Float64 nulls.
fn elect_column(name: &str, c: usize, data_rows: &[&[Data]]) -> Series {
    let mut saw_value = false;
    let mut all_numeric = true;
    let mut all_bool = true;

    for row in data_rows {
        match row.get(c).unwrap_or(&EMPTY_CELL) {
            Data::Empty | Data::Error(_) => {}
            Data::Int(_) | Data::Float(_) => {
                saw_value = true;
                all_bool = false;
            }
            Data::Bool(_) => {
                saw_value = true;
                all_numeric = false;
            }
            _ => {
                saw_value = true;
                all_numeric = false;
                all_bool = false;
            }
        }
    }

    if !saw_value || all_numeric {
        let values: Vec<Option<f64>> = data_rows
            .iter()
            .map(|row| cell_to_f64(row.get(c).unwrap_or(&EMPTY_CELL)))
            .collect();
        Series::new(name.into(), values)
    } else if all_bool {
        let values: Vec<Option<bool>> = data_rows
            .iter()
            .map(|row| match row.get(c).unwrap_or(&EMPTY_CELL) {
                Data::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        Series::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = data_rows
            .iter()
            .map(|row| cell_to_string(row.get(c).unwrap_or(&EMPTY_CELL)))
            .collect();
        Series::new(name.into(), values)
    }
}

fn cell_to_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(v) => Some(*v as f64),
        Data::Float(v) => Some(*v),
        _ => None,
    }
}

fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        // Date cells render as ISO datetimes so the temporal re-typing
        // pass can pick them up.
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .or_else(|| Some(cell.to_string())),
        other => Some(other.to_string()),
    }
}

/// Re-types string columns where at least half the values parse as
/// datetimes. The cast is permissive, so oddball values become null
/// rather than failing the load.
pub fn retype_temporal_columns(df: DataFrame) -> Result<DataFrame> {
    let mut df = df;
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for name in &names {
        let Ok(col) = df.column(name) else { continue };
        let dtype = col.dtype();
        if dtype.is_numeric() || dtype.is_temporal() || dtype.is_bool() {
            continue;
        }

        let s = col.as_materialized_series();
        if let Ok(casted) = s.cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            && casted.null_count() < s.len() / 2
        {
            let _ = df.replace(name, casted);
        }
    }
    Ok(df)
}
