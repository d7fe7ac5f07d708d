//! # Datasweep - Tabular File Cleaning Library
//!
//! Datasweep ingests tabular files (CSV and XLSX), previews them, applies
//! canned cleaning operations, reports summary statistics and missing
//! values, and re-exports the table in either format.
//!
//! ## Quick Start
//!
//! ```no_run
//! use datasweep::pipeline::{CleaningOp, ExportFormat, Session, UploadedFile};
//! use std::path::Path;
//!
//! # fn example() -> datasweep::error::Result<()> {
//! let mut session = Session::new();
//! let index = session.ingest(&UploadedFile::from_path(Path::new("data.csv"))?)?;
//!
//! // Each op reports the row counts around it
//! let report = session.apply(index, &CleaningOp::RemoveDuplicates)?;
//! println!("dropped {} rows", report.rows_before - report.rows_after);
//!
//! let exported = session.export(index, ExportFormat::Xlsx)?;
//! std::fs::write(&exported.file_name, &exported.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`pipeline`]: ingest, cleaning operations, reports, export, and the
//!   session that sequences them per uploaded file
//! - [`chart`]: chart selection validation and correlation data handoff
//! - [`error`]: error types and the crate result alias
//! - [`logging`]: console plus rolling-file logging setup

#![warn(clippy::all, rust_2018_idioms)]

pub mod chart;
pub mod error;
pub mod logging;
pub mod pipeline;
