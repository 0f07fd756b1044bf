//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! Used when a Qdrant URL is configured; otherwise the pipeline keeps its
//! index in memory (see [`crate::index::memory`]).

use std::collections::HashMap;

use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchParamsBuilder, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant, QdrantError};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::{DistanceKind, RagConfig, VectorSpace};
use crate::errors::RagError;
use crate::index::{IndexFuture, VectorIndex};
use crate::record::{IndexPoint, ScoredPoint};

/// A facade over the Qdrant client exposing the [`VectorIndex`] surface.
pub struct QdrantFacade {
    client: Qdrant,
    exact: bool,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// # Errors
    /// [`RagError::Config`] when no URL is configured or the client cannot
    /// be built.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;
        let url = cfg
            .qdrant_url
            .as_deref()
            .ok_or_else(|| RagError::Config("qdrant_url is not set".into()))?;

        let mut builder = Qdrant::from_url(url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RagError::Config(e.to_string()))?;

        info!(url, collection = %cfg.collection, "Qdrant client ready");
        Ok(Self {
            client,
            exact: cfg.exact_search,
        })
    }
}

impl VectorIndex for QdrantFacade {
    fn backend(&self) -> &'static str {
        "qdrant"
    }

    fn create_collection<'a>(
        &'a self,
        name: &'a str,
        space: &'a VectorSpace,
    ) -> IndexFuture<'a, ()> {
        Box::pin(async move {
            if self.client.collection_exists(name).await.map_err(map_err)? {
                warn!(collection = name, "collection exists, dropping it");
                self.client.delete_collection(name).await.map_err(map_err)?;
            }

            let distance = match space.distance {
                DistanceKind::Cosine => Distance::Cosine,
                DistanceKind::Dot => Distance::Dot,
                DistanceKind::Euclid => Distance::Euclid,
            };
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(name)
                        .vectors_config(VectorParamsBuilder::new(space.size as u64, distance)),
                )
                .await
                .map_err(map_err)?;

            info!(collection = name, size = space.size, ?distance, "collection created");
            Ok(())
        })
    }

    fn upsert<'a>(&'a self, collection: &'a str, points: Vec<IndexPoint>) -> IndexFuture<'a, usize> {
        Box::pin(async move {
            if points.is_empty() {
                debug!("no points provided for upsert");
                return Ok(0);
            }
            let written = points.len();
            let structs = points
                .into_iter()
                .map(|p| {
                    let payload = Payload::try_from(Value::Object(p.payload))
                        .map_err(|e| RagError::Payload(e.to_string()))?;
                    Ok(PointStruct::new(p.id, p.vector, payload))
                })
                .collect::<Result<Vec<_>, RagError>>()?;

            let res = self
                .client
                .upsert_points(UpsertPointsBuilder::new(collection, structs).wait(true))
                .await
                .map_err(map_err)?;
            debug!(collection, written, result = ?res.result, "points upserted");
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
            let mut builder =
                SearchPointsBuilder::new(collection, vector, top_k as u64).with_payload(true);
            if self.exact {
                builder = builder.params(SearchParamsBuilder::default().exact(true));
            }
            let res = self.client.search_points(builder).await.map_err(map_err)?;

            let out: Vec<ScoredPoint> = res
                .result
                .into_iter()
                .map(|r| ScoredPoint {
                    id: r
                        .id
                        .and_then(|pid| pid.point_id_options)
                        .map(|opt| match opt {
                            PointIdOptions::Uuid(s) => s,
                            PointIdOptions::Num(n) => n.to_string(),
                        })
                        .unwrap_or_default(),
                    score: r.score,
                    payload: qpayload_to_json(r.payload),
                })
                .collect();
            debug!(collection, top_k, hits = out.len(), "search completed");
            Ok(out)
        })
    }
}

/// Status texts of an unreachable server. The client reports a refused
/// connect as an `Internal` status, so the connect message matters more
/// than the code.
const CONNECTION_MARKERS: &[&str] = &[
    "Failed to connect",
    "Connection refused",
    "The service is currently unavailable",
    "Deadline expired",
    "transport error",
    "Timeout expired",
];

/// Status texts of a request the server rejected as malformed.
const INVALID_INPUT_MARKERS: &[&str] = &[
    "Client specified an invalid argument",
    "Wrong input",
];

fn map_err(e: QdrantError) -> RagError {
    classify(e.to_string())
}

/// Maps a client error message onto the crate's categories.
fn classify(msg: String) -> RagError {
    if CONNECTION_MARKERS.iter().any(|m| msg.contains(m)) {
        RagError::Connection(msg)
    } else if INVALID_INPUT_MARKERS.iter().any(|m| msg.contains(m)) {
        RagError::InvalidInput(msg)
    } else {
        RagError::Qdrant(msg)
    }
}

fn qpayload_to_json(p: HashMap<String, QValue>) -> Map<String, Value> {
    p.into_iter().map(|(k, v)| (k, qvalue_to_json(v))).collect()
}

fn qvalue_to_json(v: QValue) -> Value {
    match v.kind {
        Some(Kind::StringValue(s)) => Value::String(s),
        Some(Kind::IntegerValue(i)) => Value::from(i),
        Some(Kind::DoubleValue(f)) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Some(Kind::BoolValue(b)) => Value::Bool(b),
        Some(Kind::StructValue(s)) => Value::Object(qpayload_to_json(s.fields)),
        Some(Kind::ListValue(l)) => Value::Array(l.values.into_iter().map(qvalue_to_json).collect()),
        Some(Kind::NullValue(_)) | None => Value::Null,
    }
}
