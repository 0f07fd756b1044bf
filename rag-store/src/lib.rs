//! Vector store facade for the PDF pipeline: collection setup, batch
//! insertion and similarity retrieval.
//!
//! The index backend is pluggable through [`VectorIndex`]:
//! - [`MemoryIndex`] keeps everything in process memory (default)
//! - [`QdrantFacade`] talks to a Qdrant server when a URL is configured
//!
//! Embeddings come from an [`EmbeddingsProvider`], [`JinaEmbedder`] in
//! production.

mod config;
mod embed;
mod errors;
mod index;
mod ingest;
mod payload;
mod qdrant_facade;
mod record;
mod retrieve;

use std::sync::Arc;

use doc_loader::Chunk;
use services::uuid::fresh_ids;
use tracing::{debug, info, trace};

pub use config::{DEFAULT_DIMENSION, DistanceKind, RagConfig, VectorSpace};
pub use embed::jina::JinaEmbedder;
pub use embed::{EmbedFuture, EmbeddingsProvider};
pub use errors::{InsertError, InsertErrorKind, RagError};
pub use index::memory::MemoryIndex;
pub use index::{IndexFuture, VectorIndex};
pub use payload::{CONTENT_KEY, METADATA_KEY, chunk_to_payload, payload_to_chunk};
pub use qdrant_facade::QdrantFacade;
pub use record::{IndexPoint, RagHit, RagQuery, ScoredPoint};

/// Handle over one collection: index backend plus the embedder that fills it.
pub struct RagStore {
    cfg: RagConfig,
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingsProvider>,
}

/// Picks the index backend for `cfg`: Qdrant when a URL is set, memory otherwise.
///
/// # Errors
/// Returns [`RagError::Config`] if the config is invalid.
pub fn open_index(cfg: &RagConfig) -> Result<Arc<dyn VectorIndex>, RagError> {
    cfg.validate()?;
    Ok(match cfg.qdrant_url {
        Some(_) => Arc::new(QdrantFacade::new(cfg)?),
        None => Arc::new(MemoryIndex::new()),
    })
}

/// Creates the collection and allocates one fresh id per chunk, in order.
///
/// The collection is (re)created with `cfg.dimension` and `cfg.distance`;
/// any previous content under the same name is dropped.
///
/// # Errors
/// [`RagError::Config`] when the embedder's dimension disagrees with the
/// config, or backend errors from collection creation.
pub async fn setup(
    cfg: RagConfig,
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingsProvider>,
    chunks: &[Chunk],
) -> Result<(RagStore, Vec<String>), RagError> {
    cfg.validate()?;
    if embedder.dimension() != cfg.dimension {
        return Err(RagError::Config(format!(
            "embedder produces {} dimensions, collection expects {}",
            embedder.dimension(),
            cfg.dimension
        )));
    }

    index.create_collection(&cfg.collection, &cfg.space()).await?;
    let ids = fresh_ids(chunks.len());

    info!(
        collection = %cfg.collection,
        backend = index.backend(),
        ids = ids.len(),
        "vector store ready"
    );
    Ok((
        RagStore {
            cfg,
            index,
            embedder,
        },
        ids,
    ))
}

impl RagStore {
    pub fn config(&self) -> &RagConfig {
        &self.cfg
    }

    pub fn collection(&self) -> &str {
        &self.cfg.collection
    }

    /// Embeds and stores `chunks` under `ids` (1:1, same order).
    ///
    /// # Errors
    /// An [`InsertError`] classified by [`InsertErrorKind`]; on error the
    /// batch must be treated as not inserted.
    pub async fn add_documents(&self, chunks: &[Chunk], ids: &[String]) -> Result<usize, InsertError> {
        debug!(collection = %self.cfg.collection, chunks = chunks.len(), "add_documents");
        let written = ingest::add_documents(
            self.index.as_ref(),
            self.embedder.as_ref(),
            &self.cfg.collection,
            chunks,
            ids,
        )
        .await?;
        Ok(written)
    }

    /// Returns the `k` stored chunks most similar to `query`, best first.
    ///
    /// # Errors
    /// [`RagError::InvalidInput`] when `k` is zero; embedding or index
    /// errors otherwise.
    pub async fn similarity_search(&self, query: &str, k: u64) -> Result<Vec<RagHit>, RagError> {
        trace!(collection = %self.cfg.collection, k, "similarity_search");
        retrieve::rag_context(
            self.index.as_ref(),
            self.embedder.as_ref(),
            &self.cfg.collection,
            RagQuery {
                text: query,
                top_k: k,
            },
        )
        .await
    }
}
