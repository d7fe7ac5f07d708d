use crate::error::Result;
use polars::prelude::DataType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An uploaded file: a name (with extension) plus its raw bytes.
///
/// Immutable once constructed. Ingestion decides the parser from the
/// name's extension, never from the content.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    name: String,
    content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    /// Reads a file from disk into an upload, keeping only the base name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let content = std::fs::read(path)?;
        Ok(Self { name, content })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Lowercased extension of the file name, empty if there is none.
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase()
    }
}

/// Column type classes exposed to callers, abstracted over Polars dtypes.
#[derive(Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Debug)]
pub enum ColumnKind {
    Numeric,
    Boolean,
    Temporal,
    Text,
}

impl ColumnKind {
    pub fn from_dtype(dtype: &DataType) -> Self {
        if dtype.is_bool() {
            Self::Boolean
        } else if dtype.is_numeric() {
            Self::Numeric
        } else if dtype.is_temporal() {
            Self::Temporal
        } else {
            Self::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "Numeric",
            Self::Boolean => "Boolean",
            Self::Temporal => "Temporal",
            Self::Text => "Text",
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
