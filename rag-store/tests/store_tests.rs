use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ai_llm_service::{JinaService, LlmModelConfig, LlmProvider};
use doc_loader::Chunk;
use rag_store::{
    EmbedFuture, EmbeddingsProvider, IndexFuture, IndexPoint, InsertErrorKind, JinaEmbedder,
    MemoryIndex, RagConfig, RagError, ScoredPoint, VectorIndex, VectorSpace, setup,
};
use serde_json::json;

/// Deterministic bag-of-words embedder: each token bumps one of `dim` buckets.
struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    fn vector(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0; self.dim];
        for token in text.split_whitespace() {
            let h = token
                .to_lowercase()
                .bytes()
                .fold(17usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
            v[h % self.dim] += 1.0;
        }
        v
    }
}

impl EmbeddingsProvider for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
        Box::pin(async move { Ok(texts.iter().map(|t| self.vector(t)).collect()) })
    }
}

/// Real Jina client pointed at a port nothing listens on.
fn unreachable_jina() -> JinaEmbedder {
    let cfg = LlmModelConfig {
        provider: LlmProvider::Jina,
        model: "jina-embeddings-v2-base-en".into(),
        endpoint: "http://127.0.0.1:9".into(),
        api_key: Some("jina_test".into()),
        max_tokens: None,
        temperature: None,
        timeout_secs: Some(5),
    };
    JinaEmbedder::new(Arc::new(JinaService::new(cfg).unwrap()), 768)
}

/// Memory index that counts upsert calls.
struct CountingIndex {
    inner: MemoryIndex,
    upserts: AtomicUsize,
}

impl VectorIndex for CountingIndex {
    fn backend(&self) -> &'static str {
        "counting"
    }

    fn create_collection<'a>(
        &'a self,
        name: &'a str,
        space: &'a VectorSpace,
    ) -> IndexFuture<'a, ()> {
        self.inner.create_collection(name, space)
    }

    fn upsert<'a>(&'a self, collection: &'a str, points: Vec<IndexPoint>) -> IndexFuture<'a, usize> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert(collection, points)
    }

    fn search<'a>(
        &'a self,
        collection: &'a str,
        vector: Vec<f32>,
        top_k: usize,
    ) -> IndexFuture<'a, Vec<ScoredPoint>> {
        self.inner.search(collection, vector, top_k)
    }
}

fn page_chunk(text: &str, page: i64) -> Chunk {
    let mut metadata = BTreeMap::new();
    metadata.insert("page_number".to_string(), json!(page));
    metadata.insert("filename".to_string(), json!("report.pdf"));
    Chunk::new(text, metadata)
}

fn corpus() -> Vec<Chunk> {
    vec![
        page_chunk("annual revenue grew twelve percent", 1),
        page_chunk("the board approved a new dividend policy", 2),
        page_chunk("revenue by segment table", 3),
        page_chunk("sustainability and emissions report", 4),
    ]
}

#[tokio::test]
async fn setup_allocates_one_unique_id_per_chunk() {
    let index = Arc::new(MemoryIndex::new());
    let chunks = corpus();
    let (store, ids) = setup(
        RagConfig::new_default("qdrant_test"),
        index.clone(),
        Arc::new(HashEmbedder { dim: 768 }),
        &chunks,
    )
    .await
    .unwrap();

    assert_eq!(ids.len(), chunks.len());
    assert!(services::uuid::all_unique(&ids));
    assert_eq!(store.collection(), "qdrant_test");
    let space = index.space("qdrant_test").await.unwrap();
    assert_eq!(space.size, 768);
    assert_eq!(space.distance, rag_store::DistanceKind::Cosine);
}

#[tokio::test]
async fn setup_rejects_embedder_of_the_wrong_size() {
    let err = setup(
        RagConfig::new_default("c"),
        Arc::new(MemoryIndex::new()),
        Arc::new(HashEmbedder { dim: 384 }),
        &corpus(),
    )
    .await
    .err()
    .unwrap();
    assert!(matches!(err, RagError::Config(_)));
}

#[tokio::test]
async fn indexed_chunks_come_back_nearest_first() {
    let index = Arc::new(MemoryIndex::new());
    let chunks = corpus();
    let (store, ids) = setup(
        RagConfig::new_default("c"),
        index.clone(),
        Arc::new(HashEmbedder { dim: 768 }),
        &chunks,
    )
    .await
    .unwrap();

    assert_eq!(store.add_documents(&chunks, &ids).await.unwrap(), 4);
    assert_eq!(index.len("c").await, Some(4));

    let hits = store.similarity_search("revenue", 3).await.unwrap();
    assert!((1..=3).contains(&hits.len()));
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(hits.iter().all(|h| chunks.contains(&h.chunk)));
    assert!(hits.iter().all(|h| ids.contains(&h.id)));
    assert!(hits[0].chunk.content.contains("revenue"));

    // k larger than the collection
    let all = store.similarity_search("revenue", 10).await.unwrap();
    assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn zero_k_is_rejected() {
    let chunks = corpus();
    let (store, ids) = setup(
        RagConfig::new_default("c"),
        Arc::new(MemoryIndex::new()),
        Arc::new(HashEmbedder { dim: 768 }),
        &chunks,
    )
    .await
    .unwrap();
    store.add_documents(&chunks, &ids).await.unwrap();
    assert!(matches!(
        store.similarity_search("revenue", 0).await,
        Err(RagError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn malformed_batches_are_classified() {
    let index = Arc::new(MemoryIndex::new());
    let chunks = corpus();
    let (store, ids) = setup(
        RagConfig::new_default("c"),
        index.clone(),
        Arc::new(HashEmbedder { dim: 768 }),
        &chunks,
    )
    .await
    .unwrap();

    let err = store.add_documents(&chunks, &ids[..2]).await.unwrap_err();
    assert_eq!(err.kind, InsertErrorKind::Value);

    let bogus: Vec<String> = (0..chunks.len()).map(|i| i.to_string()).collect();
    let err = store.add_documents(&chunks, &bogus).await.unwrap_err();
    assert_eq!(err.kind, InsertErrorKind::Type);

    // nothing written by the failed attempts
    assert_eq!(index.len("c").await, Some(0));
}

#[tokio::test]
async fn unreachable_embedding_service_is_a_connection_error() {
    let index: Arc<dyn VectorIndex> = Arc::new(MemoryIndex::new());
    let chunks = corpus();
    let (store, ids) = setup(
        RagConfig::new_default("c"),
        index,
        Arc::new(unreachable_jina()),
        &chunks,
    )
    .await
    .unwrap();

    let err = store.add_documents(&chunks, &ids).await.unwrap_err();
    assert_eq!(err.kind, InsertErrorKind::Connection);
}

#[tokio::test]
async fn a_large_batch_is_written_in_one_upsert() {
    let index = Arc::new(CountingIndex {
        inner: MemoryIndex::new(),
        upserts: AtomicUsize::new(0),
    });
    let chunks: Vec<Chunk> = (0..300)
        .map(|i| page_chunk(&format!("paragraph number {i}"), i / 10 + 1))
        .collect();
    let (store, ids) = setup(
        RagConfig::new_default("c"),
        index.clone(),
        Arc::new(HashEmbedder { dim: 768 }),
        &chunks,
    )
    .await
    .unwrap();

    assert_eq!(store.add_documents(&chunks, &ids).await.unwrap(), 300);
    assert_eq!(index.upserts.load(Ordering::SeqCst), 1);
    assert_eq!(index.inner.len("c").await, Some(300));
}
