//! Runtime and collection configuration.

use crate::errors::RagError;

/// Output size of `jina-embeddings-v2-base-en`.
pub const DEFAULT_DIMENSION: usize = 768;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine similarity (higher is closer).
    Cosine,
    /// Dot product (higher is closer).
    Dot,
    /// Euclidean distance (lower is closer).
    Euclid,
}

/// Describes the vector space of the collection. Fixed at creation time.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Configuration for indexing and retrieval.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Qdrant endpoint, e.g. `http://localhost:6334`. `None` keeps the
    /// index in process memory.
    pub qdrant_url: Option<String>,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Vector size; must match the embedding model output.
    pub dimension: usize,
    /// Exact search flag (false = HNSW ANN on Qdrant; the memory index is always exact).
    pub exact_search: bool,
}

impl RagConfig {
    /// In-memory, cosine, 768-dimensional config for `collection`.
    pub fn new_default(collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: None,
            qdrant_api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            dimension: DEFAULT_DIMENSION,
            exact_search: false,
        }
    }

    pub fn space(&self) -> VectorSpace {
        VectorSpace {
            size: self.dimension,
            distance: self.distance,
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if let Some(url) = &self.qdrant_url {
            if url.trim().is_empty() {
                return Err(RagError::Config("qdrant_url is empty".into()));
            }
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.dimension == 0 {
            return Err(RagError::Config("dimension must be > 0".into()));
        }
        Ok(())
    }
}
