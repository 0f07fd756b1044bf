use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use contextor::{
    ChatModel, ContextorError, InsertPolicy, NoopProgress, RunSettings, run_pipeline,
};
use doc_loader::{Chunk, DocumentLoader, LoadError};
use rag_store::{
    EmbedFuture, EmbeddingsProvider, IndexFuture, IndexPoint, InsertErrorKind, MemoryIndex,
    RagError, ScoredPoint, VectorIndex, VectorSpace,
};
use serde_json::json;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

/* ----------------------------- fakes ----------------------------------- */

/// Returns a fixed 25-chunk "annual report", one topic per page.
struct FakeLoader;

const TOPICS: [&str; 25] = [
    "dividends paid to shareholders",
    "board of directors composition",
    "risk management framework",
    "market data products",
    "total revenue grew in the year",
    "listing segments overview",
    "clearing house operations",
    "technology investments",
    "human resources headcount",
    "sustainability commitments",
    "corporate governance practices",
    "financial statements summary",
    "cash flow analysis",
    "debt and leverage",
    "share buyback program",
    "regulatory environment",
    "new products launched",
    "client base expansion",
    "operational efficiency",
    "cybersecurity posture",
    "audit committee report",
    "related party transactions",
    "tax contributions",
    "outlook for the next year",
    "glossary of terms",
];

impl DocumentLoader for FakeLoader {
    fn load<'a>(
        &'a self,
        _path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Chunk>, LoadError>> + Send + 'a>> {
        Box::pin(async {
            Ok(TOPICS
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    let mut metadata = BTreeMap::new();
                    metadata.insert("page_number".to_string(), json!(i as i64 + 1));
                    metadata.insert("filename".to_string(), json!("relatorio.pdf"));
                    metadata.insert("category".to_string(), json!("NarrativeText"));
                    Chunk::new(*t, metadata)
                })
                .collect())
        })
    }
}

/// Bag-of-words hashing embedder, 768 buckets.
struct HashEmbedder;

fn bucket(token: &str) -> usize {
    token
        .bytes()
        .fold(7usize, |acc, b| acc.wrapping_mul(131).wrapping_add(b as usize))
        % 768
}

impl EmbeddingsProvider for HashEmbedder {
    fn dimension(&self) -> usize {
        768
    }

    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
        Box::pin(async move {
            Ok(texts
                .iter()
                .map(|t| {
                    let mut v = vec![0.0f32; 768];
                    for tok in t.to_lowercase().split_whitespace() {
                        v[bucket(tok)] += 1.0;
                    }
                    v
                })
                .collect())
        })
    }
}

/// Records the prompts it receives and answers with a canned text.
#[derive(Default)]
struct FakeChat {
    seen: Mutex<Vec<(String, String)>>,
}

impl ChatModel for FakeChat {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ContextorError>> + Send + 'a>> {
        Box::pin(async move {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            Ok("The document has 25 pages.".to_string())
        })
    }
}

/// Memory index whose upserts always fail with a payload (type) error.
struct RejectingIndex(MemoryIndex);

impl VectorIndex for RejectingIndex {
    fn backend(&self) -> &'static str {
        "rejecting"
    }

    fn create_collection<'a>(&'a self, name: &'a str, space: &'a VectorSpace) -> IndexFuture<'a, ()> {
        self.0.create_collection(name, space)
    }

    fn upsert<'a>(&'a self, _collection: &'a str, _points: Vec<IndexPoint>) -> IndexFuture<'a, usize> {
        Box::pin(async { Err(RagError::Payload("metadata is not a mapping".into())) })
    }

    fn search<'a>(
        &'a self,
        collection: &'a str,
        vector: Vec<f32>,
        top_k: usize,
    ) -> IndexFuture<'a, Vec<ScoredPoint>> {
        self.0.search(collection, vector, top_k)
    }
}

/* -------------------------- log capture -------------------------------- */

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<String>>>);

struct LineVisitor<'a>(&'a mut String);

impl Visit for LineVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        use std::fmt::Write;
        let _ = write!(self.0, "{}={:?} ", field.name(), value);
    }
}

impl<S: Subscriber> Layer<S> for Captured {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut line = format!("{} ", event.metadata().level());
        event.record(&mut LineVisitor(&mut line));
        self.0.lock().unwrap().push(line);
    }
}

impl Captured {
    fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/* ------------------------------ tests ---------------------------------- */

#[tokio::test]
async fn full_run_answers_from_three_ranked_chunks() {
    let index = Arc::new(MemoryIndex::new());
    let chat = FakeChat::default();
    let mut run = RunSettings::new("relatorio.pdf");
    run.query = "How much did total revenue grow?".into();

    let report = run_pipeline(
        &run,
        &FakeLoader,
        index.clone(),
        Arc::new(HashEmbedder),
        &chat,
        &NoopProgress,
    )
    .await
    .unwrap();

    // setup: 768-d cosine collection, one id per chunk
    let space = index.space("qdrant_test").await.unwrap();
    assert_eq!(space.size, 768);
    assert_eq!(space.distance, rag_store::DistanceKind::Cosine);
    assert_eq!(report.ids.len(), 25);
    assert!(services::uuid::all_unique(&report.ids));

    // indexing wrote everything
    assert_eq!(*report.inserted.as_ref().unwrap(), 25);
    assert_eq!(index.len("qdrant_test").await, Some(25));

    // exactly k chunks fed to the model, best first
    assert_eq!(report.qa.context.len(), 3);
    assert_eq!(report.qa.context[0].page, Some(5));
    assert!(report.qa.context.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(!report.qa.answer.is_empty());

    // one request: fixed system text, page-labelled context
    let seen = chat.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "You are a helpful assistant.");
    assert!(seen[0].1.contains("Context: Page 5: total revenue grew in the year\n\nPage "));
    assert!(seen[0].1.ends_with("Question: How much did total revenue grow?\n\nAnswer:"));
}

#[tokio::test]
async fn failed_insert_is_logged_and_the_run_continues() {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::registry().with(captured.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let chat = FakeChat::default();
    let report = run_pipeline(
        &RunSettings::new("relatorio.pdf"),
        &FakeLoader,
        Arc::new(RejectingIndex(MemoryIndex::new())),
        Arc::new(HashEmbedder),
        &chat,
        &NoopProgress,
    )
    .await
    .unwrap();

    let err = report.inserted.unwrap_err();
    assert_eq!(err.kind, InsertErrorKind::Type);
    assert!(report.qa.context.is_empty());
    assert!(!report.qa.answer.is_empty());

    let lines = captured.lines();
    assert!(
        lines
            .iter()
            .any(|l| l.starts_with("ERROR") && l.contains("kind=type")),
        "no error line in {lines:?}"
    );
}

#[tokio::test]
async fn abort_policy_stops_the_run() {
    let mut run = RunSettings::new("relatorio.pdf");
    run.insert_policy = InsertPolicy::Abort;
    let chat = FakeChat::default();

    let err = run_pipeline(
        &run,
        &FakeLoader,
        Arc::new(RejectingIndex(MemoryIndex::new())),
        Arc::new(HashEmbedder),
        &chat,
        &NoopProgress,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ContextorError::Insert(e) if e.kind == InsertErrorKind::Type));
    assert!(chat.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_document_is_fatal() {
    struct Blank;
    impl DocumentLoader for Blank {
        fn load<'a>(
            &'a self,
            _path: &'a Path,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<Chunk>, LoadError>> + Send + 'a>> {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    let err = run_pipeline(
        &RunSettings::new("blank.pdf"),
        &Blank,
        Arc::new(MemoryIndex::new()),
        Arc::new(HashEmbedder),
        &FakeChat::default(),
        &NoopProgress,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ContextorError::Load(LoadError::Empty(_))));
}
