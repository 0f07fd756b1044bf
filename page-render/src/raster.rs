//! PDF page rasterization.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use image::{ImageFormat, RgbaImage};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::errors::RenderError;

/// Turns one page of a PDF into pixels.
pub trait PageRasterizer: Send + Sync {
    /// Renders 1-based `page` of `path`.
    fn rasterize<'a>(
        &'a self,
        path: &'a Path,
        page: u32,
    ) -> Pin<Box<dyn Future<Output = Result<RgbaImage, RenderError>> + Send + 'a>>;
}

/// Rasterizer backed by poppler's `pdftoppm` binary.
#[derive(Clone, Debug)]
pub struct PdftoppmRasterizer {
    /// Resolution in DPI.
    pub dpi: u32,
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self { dpi: 150 }
    }
}

const PROGRAM: &str = "pdftoppm";

impl PdftoppmRasterizer {
    fn args(&self, path: &Path, page: u32) -> Vec<String> {
        let n = page.to_string();
        vec![
            "-png".into(),
            "-singlefile".into(),
            "-r".into(),
            self.dpi.to_string(),
            "-f".into(),
            n.clone(),
            "-l".into(),
            n,
            path.display().to_string(),
        ]
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize<'a>(
        &'a self,
        path: &'a Path,
        page: u32,
    ) -> Pin<Box<dyn Future<Output = Result<RgbaImage, RenderError>> + Send + 'a>> {
        Box::pin(async move {
            if page == 0 {
                return Err(RenderError::InvalidPage(page));
            }
            debug!(path = %path.display(), page, dpi = self.dpi, "running {PROGRAM}");

            // Without an output root pdftoppm writes the PNG to stdout.
            let output = Command::new(PROGRAM)
                .args(self.args(path, page))
                .output()
                .await
                .map_err(|source| RenderError::Spawn {
                    program: PROGRAM,
                    source,
                })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                warn!(%stderr, page, "{PROGRAM} failed");
                return Err(RenderError::Rasterize {
                    program: PROGRAM,
                    stderr,
                });
            }

            let img = image::load_from_memory_with_format(&output.stdout, ImageFormat::Png)?;
            Ok(img.to_rgba8())
        })
    }
}
