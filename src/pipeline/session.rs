//! In-memory session state: one table per ingested file.
//!
//! A [`Session`] owns an ordered list of [`TableSlot`]s. Slots never share
//! data, so cleaning one table cannot disturb another, and a file that
//! fails to ingest never aborts the rest of a batch.

use crate::error::{Result, SweepError};
use crate::pipeline::export::{self, ExportFormat, ExportResult};
use crate::pipeline::ingest;
use crate::pipeline::ops::{self, CleaningOp, OpPipeline};
use crate::pipeline::types::UploadedFile;
use polars::prelude::*;
use tracing::{error, info};

/// One ingested file and its current working table.
pub struct TableSlot {
    pub file_name: String,
    pub size_bytes: u64,
    pub df: DataFrame,
}

/// Row counts around one applied cleaning step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpReport {
    pub op: &'static str,
    pub rows_before: usize,
    pub rows_after: usize,
}

#[derive(Default)]
pub struct Session {
    slots: Vec<TableSlot>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `file` and appends a slot for it, returning the slot index.
    pub fn ingest(&mut self, file: &UploadedFile) -> Result<usize> {
        let df = ingest::ingest(file)?;
        info!(
            "Ingested '{}': {} rows, {} columns",
            file.name(),
            df.height(),
            df.width()
        );
        self.slots.push(TableSlot {
            file_name: file.name().to_owned(),
            size_bytes: file.size_bytes(),
            df,
        });
        Ok(self.slots.len() - 1)
    }

    /// Ingests a batch, reporting each file's outcome separately. A file
    /// that fails is logged and skipped; the rest still load.
    pub fn ingest_all(&mut self, files: &[UploadedFile]) -> Vec<(String, Result<usize>)> {
        files
            .iter()
            .map(|file| {
                let outcome = self.ingest(file);
                if let Err(e) = &outcome {
                    error!("Skipping '{}': {e}", file.name());
                }
                (file.name().to_owned(), outcome)
            })
            .collect()
    }

    /// Applies one cleaning step to the table at `index`, replacing it
    /// with the result.
    pub fn apply(&mut self, index: usize, op: &CleaningOp) -> Result<OpReport> {
        let slot = self.slot_mut(index)?;
        let rows_before = slot.df.height();
        let cleaned = ops::apply(&slot.df, op)?;
        let rows_after = cleaned.height();
        slot.df = cleaned;
        info!(
            "Applied {} to '{}': {} -> {} rows",
            op.name(),
            slot.file_name,
            rows_before,
            rows_after
        );
        Ok(OpReport {
            op: op.name(),
            rows_before,
            rows_after,
        })
    }

    /// Runs a whole pipeline against the table at `index`, one report per
    /// step. Stops at the first failing step.
    pub fn apply_pipeline(
        &mut self,
        index: usize,
        pipeline: &OpPipeline,
    ) -> Result<Vec<OpReport>> {
        let mut reports = Vec::with_capacity(pipeline.len());
        for op in pipeline.iter() {
            reports.push(self.apply(index, op)?);
        }
        Ok(reports)
    }

    /// Serializes the table at `index` without consuming the slot.
    pub fn export(&self, index: usize, format: ExportFormat) -> Result<ExportResult> {
        let slot = self.slot(index)?;
        export::export(&slot.df, &slot.file_name, format)
    }

    pub fn slot(&self, index: usize) -> Result<&TableSlot> {
        self.slots
            .get(index)
            .ok_or_else(|| SweepError::Data(format!("no table at index {index}")))
    }

    pub fn slot_mut(&mut self, index: usize) -> Result<&mut TableSlot> {
        self.slots
            .get_mut(index)
            .ok_or_else(|| SweepError::Data(format!("no table at index {index}")))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TableSlot> {
        self.slots.iter()
    }
}
