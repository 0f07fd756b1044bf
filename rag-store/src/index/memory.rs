//! In-process vector index with exact search.
//!
//! Collections live in a `HashMap` behind a `tokio::sync::RwLock`. Points
//! keep insertion order, which is also the tie-break order of search
//! results.

use std::cmp::Ordering;
use std::collections::HashMap;

use services::uuid::is_uuid;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::{DistanceKind, VectorSpace};
use crate::errors::RagError;
use crate::index::{IndexFuture, VectorIndex};
use crate::record::{IndexPoint, ScoredPoint};

#[derive(Debug)]
struct Collection {
    space: VectorSpace,
    points: Vec<IndexPoint>,
    by_id: HashMap<String, usize>,
}

/// Exact-scan index held in memory; dropped with the process.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points stored in `collection`, if it exists.
    pub async fn len(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|c| c.points.len())
    }

    /// Vector space of `collection`, if it exists.
    pub async fn space(&self, collection: &str) -> Option<VectorSpace> {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|c| c.space.clone())
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot = dot(a, b);
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn euclid(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Scores `b` against `a`; for Euclid lower means closer.
fn score(distance: DistanceKind, a: &[f32], b: &[f32]) -> f32 {
    match distance {
        DistanceKind::Cosine => cosine(a, b),
        DistanceKind::Dot => dot(a, b),
        DistanceKind::Euclid => euclid(a, b),
    }
}

fn best_first(distance: DistanceKind, a: f32, b: f32) -> Ordering {
    let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    match distance {
        DistanceKind::Euclid => ord,
        DistanceKind::Cosine | DistanceKind::Dot => ord.reverse(),
    }
}

impl VectorIndex for MemoryIndex {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn create_collection<'a>(
        &'a self,
        name: &'a str,
        space: &'a VectorSpace,
    ) -> IndexFuture<'a, ()> {
        Box::pin(async move {
            if space.size == 0 {
                return Err(RagError::InvalidInput("vector size must be > 0".into()));
            }
            let mut collections = self.collections.write().await;
            let replaced = collections
                .insert(
                    name.to_string(),
                    Collection {
                        space: space.clone(),
                        points: Vec::new(),
                        by_id: HashMap::new(),
                    },
                )
                .is_some();
            info!(
                collection = name,
                size = space.size,
                distance = ?space.distance,
                replaced,
                "collection created"
            );
            Ok(())
        })
    }

    fn upsert<'a>(&'a self, collection: &'a str, points: Vec<IndexPoint>) -> IndexFuture<'a, usize> {
        Box::pin(async move {
            let mut collections = self.collections.write().await;
            let coll = collections
                .get_mut(collection)
                .ok_or_else(|| RagError::UnknownCollection(collection.to_string()))?;

            // Validate the whole batch before touching the collection.
            for p in &points {
                if !is_uuid(&p.id) {
                    return Err(RagError::InvalidPointId(p.id.clone()));
                }
                if p.vector.len() != coll.space.size {
                    return Err(RagError::VectorSizeMismatch {
                        got: p.vector.len(),
                        want: coll.space.size,
                    });
                }
            }

            let written = points.len();
            for p in points {
                match coll.by_id.get(&p.id) {
                    Some(&at) => coll.points[at] = p,
                    None => {
                        coll.by_id.insert(p.id.clone(), coll.points.len());
                        coll.points.push(p);
                    }
                }
            }
            debug!(collection, written, total = coll.points.len(), "points upserted");
            Ok(written)
        })
    }

    fn search<'a>(
        &'a self,
        collection: &'a str,
        vector: Vec<f32>,
        top_k: usize,
    ) -> IndexFuture<'a, Vec<ScoredPoint>> {
        Box::pin(async move {
            let collections = self.collections.read().await;
            let coll = collections
                .get(collection)
                .ok_or_else(|| RagError::UnknownCollection(collection.to_string()))?;
            if vector.len() != coll.space.size {
                return Err(RagError::VectorSizeMismatch {
                    got: vector.len(),
                    want: coll.space.size,
                });
            }

            let distance = coll.space.distance;
            let mut scored: Vec<ScoredPoint> = coll
                .points
                .iter()
                .map(|p| ScoredPoint {
                    id: p.id.clone(),
                    score: score(distance, &vector, &p.vector),
                    payload: p.payload.clone(),
                })
                .collect();

            // Stable sort: equal scores keep insertion order.
            scored.sort_by(|a, b| best_first(distance, a.score, b.score));
            scored.truncate(top_k);
            debug!(collection, top_k, hits = scored.len(), "exact search done");
            Ok(scored)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::Value;
    use services::uuid::fresh_ids;

    fn space(size: usize, distance: DistanceKind) -> VectorSpace {
        VectorSpace { size, distance }
    }

    fn point(id: &str, vector: Vec<f32>, tag: &str) -> IndexPoint {
        let mut payload = serde_json::Map::new();
        payload.insert("page_content".into(), Value::String(tag.into()));
        IndexPoint {
            id: id.into(),
            vector,
            payload,
        }
    }

    fn tags(hits: &[ScoredPoint]) -> Vec<&str> {
        hits.iter()
            .map(|h| h.payload["page_content"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn cosine_search_orders_by_similarity() {
        let idx = MemoryIndex::new();
        idx.create_collection("c", &space(2, DistanceKind::Cosine))
            .await
            .unwrap();
        let ids = fresh_ids(3);
        idx.upsert(
            "c",
            vec![
                point(&ids[0], vec![0.0, 1.0], "up"),
                point(&ids[1], vec![1.0, 0.0], "right"),
                point(&ids[2], vec![1.0, 1.0], "diag"),
            ],
        )
        .await
        .unwrap();

        let hits = idx.search("c", vec![1.0, 0.1], 2).await.unwrap();
        assert_eq!(tags(&hits), ["right", "diag"]);
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn euclid_prefers_smaller_distance() {
        let idx = MemoryIndex::new();
        idx.create_collection("c", &space(1, DistanceKind::Euclid))
            .await
            .unwrap();
        let ids = fresh_ids(2);
        idx.upsert(
            "c",
            vec![point(&ids[0], vec![10.0], "far"), point(&ids[1], vec![1.0], "near")],
        )
        .await
        .unwrap();
        let hits = idx.search("c", vec![0.0], 5).await.unwrap();
        assert_eq!(tags(&hits), ["near", "far"]);
    }

    #[tokio::test]
    async fn ties_keep_insertion_order() {
        let idx = MemoryIndex::new();
        idx.create_collection("c", &space(2, DistanceKind::Cosine))
            .await
            .unwrap();
        let ids = fresh_ids(3);
        idx.upsert(
            "c",
            vec![
                point(&ids[0], vec![1.0, 0.0], "a"),
                point(&ids[1], vec![2.0, 0.0], "b"),
                point(&ids[2], vec![3.0, 0.0], "c"),
            ],
        )
        .await
        .unwrap();
        let hits = idx.search("c", vec![1.0, 0.0], 3).await.unwrap();
        assert_eq!(tags(&hits), ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn upsert_replaces_by_id() {
        let idx = MemoryIndex::new();
        idx.create_collection("c", &space(2, DistanceKind::Cosine))
            .await
            .unwrap();
        let ids = fresh_ids(1);
        idx.upsert("c", vec![point(&ids[0], vec![1.0, 0.0], "old")])
            .await
            .unwrap();
        idx.upsert("c", vec![point(&ids[0], vec![0.0, 1.0], "new")])
            .await
            .unwrap();
        assert_eq!(idx.len("c").await, Some(1));
        let hits = idx.search("c", vec![0.0, 1.0], 1).await.unwrap();
        assert_eq!(tags(&hits), ["new"]);
    }

    #[tokio::test]
    async fn recreating_a_collection_empties_it() {
        let idx = MemoryIndex::new();
        let s = space(2, DistanceKind::Cosine);
        idx.create_collection("c", &s).await.unwrap();
        idx.upsert("c", vec![point(&fresh_ids(1)[0], vec![1.0, 0.0], "x")])
            .await
            .unwrap();
        idx.create_collection("c", &s).await.unwrap();
        assert_eq!(idx.len("c").await, Some(0));
        assert_eq!(idx.space("c").await, Some(s));
    }

    #[tokio::test]
    async fn invalid_batches_are_rejected_whole() {
        let idx = MemoryIndex::new();
        idx.create_collection("c", &space(2, DistanceKind::Cosine))
            .await
            .unwrap();
        let ids = fresh_ids(1);

        let err = idx
            .upsert(
                "c",
                vec![
                    point(&ids[0], vec![1.0, 0.0], "ok"),
                    point("chunk-2", vec![1.0, 0.0], "bad id"),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::InvalidPointId(id) if id == "chunk-2"));
        assert_eq!(idx.len("c").await, Some(0));

        let err = idx
            .upsert("c", vec![point(&ids[0], vec![1.0, 0.0, 0.0], "wide")])
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::VectorSizeMismatch { got: 3, want: 2 }));
    }

    #[tokio::test]
    async fn unknown_collection() {
        let idx = MemoryIndex::new();
        assert!(matches!(
            idx.search("missing", vec![1.0], 1).await,
            Err(RagError::UnknownCollection(_))
        ));
        assert!(matches!(
            idx.upsert("missing", vec![]).await,
            Err(RagError::UnknownCollection(_))
        ));
    }

    proptest! {
        #[test]
        fn cosine_is_bounded_and_symmetric(
            a in prop::collection::vec(-100.0f32..100.0, 4),
            b in prop::collection::vec(-100.0f32..100.0, 4),
        ) {
            let ab = cosine(&a, &b);
            let ba = cosine(&b, &a);
            prop_assert!((ab - ba).abs() < 1e-5);
            prop_assert!((-1.0001..=1.0001).contains(&ab));
        }
    }
}
