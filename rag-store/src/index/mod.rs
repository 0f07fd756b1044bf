//! Vector index backends.

use std::{future::Future, pin::Pin};

use crate::config::VectorSpace;
use crate::errors::RagError;
use crate::record::{IndexPoint, ScoredPoint};

pub mod memory;

/// Boxed future returned by [`VectorIndex`] methods.
pub type IndexFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RagError>> + Send + 'a>>;

/// Storage of (id, vector, payload) points grouped in named collections.
pub trait VectorIndex: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Creates `name` with a fixed vector space. An existing collection of
    /// the same name is dropped first.
    fn create_collection<'a>(&'a self, name: &'a str, space: &'a VectorSpace)
    -> IndexFuture<'a, ()>;

    /// Inserts or replaces points by id. Returns the number written.
    fn upsert<'a>(&'a self, collection: &'a str, points: Vec<IndexPoint>) -> IndexFuture<'a, usize>;

    /// Returns at most `top_k` points, best first.
    fn search<'a>(
        &'a self,
        collection: &'a str,
        vector: Vec<f32>,
        top_k: usize,
    ) -> IndexFuture<'a, Vec<ScoredPoint>>;
}
