//! Unified error types for the crate.

use std::fmt;

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Mismatch in vector dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Chunks and identifiers are not 1:1.
    #[error("{chunks} chunks but {ids} identifiers")]
    LengthMismatch { chunks: usize, ids: usize },

    /// Malformed argument value (empty batch, duplicate id, k = 0, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Identifier the index cannot use as a point key.
    #[error("point id `{0}` is not a UUID")]
    InvalidPointId(String),

    /// Payload with an unexpected shape.
    #[error("payload error: {0}")]
    Payload(String),

    /// The collection was never created.
    #[error("collection `{0}` does not exist")]
    UnknownCollection(String),

    /// Embedding provider did not return a vector.
    #[error("missing embedding for input")]
    MissingEmbedding,

    /// Embedding service failures.
    #[error("embedding error: {0}")]
    Embedding(#[from] AiLlmError),

    /// Index backend unreachable.
    #[error("index backend unreachable: {0}")]
    Connection(String),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),
}

/// Category of an insertion failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertErrorKind {
    /// Malformed input value.
    Value,
    /// Type mismatch in the document list or ids.
    Type,
    /// Embedding service or index backend unreachable.
    Connection,
    /// Anything else.
    Unexpected,
}

impl fmt::Display for InsertErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InsertErrorKind::Value => "value",
            InsertErrorKind::Type => "type",
            InsertErrorKind::Connection => "connection",
            InsertErrorKind::Unexpected => "unexpected",
        })
    }
}

impl RagError {
    /// Classifies the error for insertion reporting.
    pub fn kind(&self) -> InsertErrorKind {
        match self {
            RagError::VectorSizeMismatch { .. }
            | RagError::LengthMismatch { .. }
            | RagError::InvalidInput(_)
            | RagError::UnknownCollection(_)
            | RagError::MissingEmbedding => InsertErrorKind::Value,
            RagError::InvalidPointId(_) | RagError::Payload(_) => InsertErrorKind::Type,
            RagError::Connection(_) => InsertErrorKind::Connection,
            RagError::Embedding(e) if e.is_connection() => InsertErrorKind::Connection,
            RagError::Embedding(_) | RagError::Config(_) | RagError::Qdrant(_) => {
                InsertErrorKind::Unexpected
            }
        }
    }
}

/// Failed batch insertion. The batch is treated as not durably inserted.
#[derive(Debug, Error)]
#[error("{kind} error while adding documents: {source}")]
pub struct InsertError {
    pub kind: InsertErrorKind,
    #[source]
    pub source: RagError,
}

impl From<RagError> for InsertError {
    fn from(source: RagError) -> Self {
        Self {
            kind: source.kind(),
            source,
        }
    }
}
