//! Retrieval: query text -> embedding -> top-k hits.

use tracing::{debug, trace};

use crate::embed::EmbeddingsProvider;
use crate::errors::RagError;
use crate::index::VectorIndex;
use crate::payload::payload_to_chunk;
use crate::record::{RagHit, RagQuery};

/// Embeds the query text and returns hits best first.
///
/// # Errors
/// [`RagError::InvalidInput`] when `top_k` is zero; embedding, index and
/// payload errors otherwise.
pub(crate) async fn rag_context(
    index: &dyn VectorIndex,
    embedder: &dyn EmbeddingsProvider,
    collection: &str,
    query: RagQuery<'_>,
) -> Result<Vec<RagHit>, RagError> {
    trace!(top_k = query.top_k, query_len = query.text.len(), "rag_context");
    if query.top_k == 0 {
        return Err(RagError::InvalidInput("k must be at least 1".into()));
    }

    let qv = embedder.embed(query.text).await?;
    if qv.len() != embedder.dimension() {
        return Err(RagError::VectorSizeMismatch {
            got: qv.len(),
            want: embedder.dimension(),
        });
    }

    let scored = index
        .search(collection, qv, query.top_k as usize)
        .await?;

    let hits = scored
        .into_iter()
        .map(|p| {
            Ok(RagHit {
                id: p.id,
                score: p.score,
                chunk: payload_to_chunk(p.payload)?,
            })
        })
        .collect::<Result<Vec<_>, RagError>>()?;

    debug!(collection, hits = hits.len(), "retrieval done");
    Ok(hits)
}
