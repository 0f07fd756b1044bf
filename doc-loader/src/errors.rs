//! Error type for document loading.

use thiserror::Error;

/// Any failure while turning a file into chunks. Fatal for a pipeline run.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or missing partition settings.
    #[error("config error: {0}")]
    Config(String),

    /// The partition service could not be reached.
    #[error("partition service unreachable: {0}")]
    Http(#[from] reqwest::Error),

    /// The partition service rejected the file.
    #[error("partition service returned HTTP {status}: {snippet}")]
    Rejected { status: u16, snippet: String },

    /// The response body was not the expected element list.
    #[error("cannot decode partition response: {0}")]
    Decode(String),

    /// The document produced no elements at all.
    #[error("document {0} produced no chunks")]
    Empty(String),
}
