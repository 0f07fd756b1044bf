//! Chunk model: one parsed unit of document content plus layout metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form chunk metadata (`page_number`, `filename`, `category`,
/// `coordinates`, ... as returned by the partition service).
pub type Metadata = BTreeMap<String, Value>;

/// A unit of document content. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Bounding polygon of a chunk in the layout's pixel space.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Coordinates {
    pub points: Vec<(f64, f64)>,
    pub layout_width: f64,
    pub layout_height: f64,
    #[serde(default)]
    pub system: Option<String>,
}

impl Chunk {
    pub fn new(content: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    /// 1-based page number, if the metadata carries an integer one.
    pub fn page_number(&self) -> Option<i64> {
        self.metadata.get("page_number").and_then(Value::as_i64)
    }

    /// Page number as printed in prompts. Accepts any scalar the partition
    /// service may send (`5`, `"iv"`, `3.0`); `None` for null, empty or
    /// absent values.
    pub fn page_label(&self) -> Option<String> {
        match self.metadata.get("page_number")? {
            Value::Null | Value::Array(_) | Value::Object(_) => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn filename(&self) -> Option<&str> {
        self.metadata.get("filename").and_then(Value::as_str)
    }

    /// Content category such as `Title`, `NarrativeText`, `Table`, `Image`.
    pub fn category(&self) -> Option<&str> {
        self.metadata.get("category").and_then(Value::as_str)
    }

    /// Layout coordinates; `None` when absent or malformed.
    pub fn coordinates(&self) -> Option<Coordinates> {
        let raw = self.metadata.get("coordinates")?;
        serde_json::from_value(raw.clone()).ok()
    }
}
