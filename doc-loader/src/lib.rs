//! Document loading: file path in, ordered layout-annotated chunks out.
//!
//! Parsing is delegated to the Unstructured partition API (high-resolution
//! strategy with bounding-box coordinates). This crate only ships the bytes,
//! decodes the element list and exposes it as [`Chunk`]s in reading order.

mod chunk;
mod config;
mod errors;
mod loader;
mod unstructured;

pub use chunk::{Chunk, Coordinates, Metadata};
pub use config::PartitionConfig;
pub use errors::LoadError;
pub use loader::{DocumentLoader, load};
pub use unstructured::{UnstructuredClient, parse_elements};
