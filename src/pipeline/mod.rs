//! The tabular pipeline: ingest, clean, report, export.

pub mod export;
pub mod ingest;
pub mod ops;
pub mod report;
pub mod session;
pub mod types;

pub use export::{ExportFormat, ExportResult, export};
pub use ingest::ingest;
pub use ops::{CleaningOp, DEFAULT_OUTLIER_THRESHOLD, OpPipeline};
pub use report::{
    DEFAULT_PREVIEW_ROWS, MissingEntry, NumericSummary, missing_report, preview, summarize,
};
pub use session::{OpReport, Session, TableSlot};
pub use types::{ColumnKind, UploadedFile};

#[cfg(test)]
mod tests;
