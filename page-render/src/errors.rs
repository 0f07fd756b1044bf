use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Page numbers are 1-based.
    #[error("invalid page number {0}")]
    InvalidPage(u32),

    /// The rasterizer binary could not be started.
    #[error("failed to run `{program}`: {source} (is poppler-utils installed?)")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The rasterizer exited with a failure status.
    #[error("`{program}` failed: {stderr}")]
    Rasterize {
        program: &'static str,
        stderr: String,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
