//! Batch insertion: chunks + ids -> embeddings -> points -> index.

use doc_loader::Chunk;
use services::uuid::{all_unique, is_uuid};
use tracing::{debug, info};

use crate::embed::{EmbeddingsProvider, check_dimensions};
use crate::errors::RagError;
use crate::index::VectorIndex;
use crate::payload::chunk_to_payload;
use crate::record::IndexPoint;

/// Checks that `chunks` and `ids` can be inserted together.
pub(crate) fn validate_batch(chunks: &[Chunk], ids: &[String]) -> Result<(), RagError> {
    if chunks.len() != ids.len() {
        return Err(RagError::LengthMismatch {
            chunks: chunks.len(),
            ids: ids.len(),
        });
    }
    if chunks.is_empty() {
        return Err(RagError::InvalidInput("no documents to add".into()));
    }
    if let Some(bad) = ids.iter().find(|id| !is_uuid(id)) {
        return Err(RagError::InvalidPointId(bad.clone()));
    }
    if !all_unique(ids) {
        return Err(RagError::InvalidInput("duplicate ids in batch".into()));
    }
    Ok(())
}

/// Embeds every chunk in one provider call and upserts all points in one
/// index call. Returns the number of points written.
pub(crate) async fn add_documents(
    index: &dyn VectorIndex,
    embedder: &dyn EmbeddingsProvider,
    collection: &str,
    chunks: &[Chunk],
    ids: &[String],
) -> Result<usize, RagError> {
    validate_batch(chunks, ids)?;

    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let vectors = embedder.embed_batch(&texts).await?;
    if vectors.len() != chunks.len() {
        return Err(RagError::MissingEmbedding);
    }
    check_dimensions(&vectors, embedder.dimension())?;

    let points: Vec<IndexPoint> = chunks
        .iter()
        .zip(ids)
        .zip(vectors)
        .map(|((chunk, id), vector)| IndexPoint {
            id: id.clone(),
            vector,
            payload: chunk_to_payload(chunk),
        })
        .collect();

    let written = index.upsert(collection, points).await?;
    debug!(collection, written, "points upserted");

    let filename = chunks
        .first()
        .and_then(Chunk::filename)
        .unwrap_or("<unknown>");
    info!(collection, points = written, backend = index.backend(), "document {filename} added to vector store");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::uuid::fresh_ids;

    fn chunks(n: usize) -> Vec<Chunk> {
        (0..n)
            .map(|i| Chunk::new(format!("text {i}"), Default::default()))
            .collect()
    }

    #[test]
    fn batch_validation() {
        let ids = fresh_ids(2);
        assert!(validate_batch(&chunks(2), &ids).is_ok());
        assert!(matches!(
            validate_batch(&chunks(3), &ids),
            Err(RagError::LengthMismatch { chunks: 3, ids: 2 })
        ));
        assert!(matches!(
            validate_batch(&[], &[]),
            Err(RagError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_batch(&chunks(1), &["1".to_string()]),
            Err(RagError::InvalidPointId(_))
        ));
        let dup = vec![ids[0].clone(), ids[0].clone()];
        assert!(matches!(
            validate_batch(&chunks(2), &dup),
            Err(RagError::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_text_is_accepted() {
        let blank = vec![Chunk::new("", Default::default())];
        assert!(validate_batch(&blank, &fresh_ids(1)).is_ok());
    }
}
