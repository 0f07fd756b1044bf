//! Diagnostic rendering of partitioned pages: the page raster with each
//! chunk's bounding polygon stroked in a per-category color.

mod errors;
mod overlay;
mod raster;

use std::io::Cursor;
use std::path::Path;

use doc_loader::Chunk;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbaImage};
use tracing::{debug, info};

pub use errors::RenderError;
pub use overlay::{
    IMAGE_COLOR, LegendEntry, TABLE_COLOR, TEXT_COLOR, TITLE_COLOR, color_for, draw_overlay,
    legend_for, segments_for_page,
};
pub use raster::{PageRasterizer, PdftoppmRasterizer};

/// Annotated page image and its legend.
#[derive(Debug)]
pub struct RenderedPage {
    pub image: RgbaImage,
    pub legend: Vec<LegendEntry>,
}

/// Rasterizes 1-based `page` of `path` and overlays the chunks of that page.
///
/// With `print_text`, each segment's text is printed followed by a blank line.
///
/// # Errors
/// [`RenderError`] when the page cannot be rasterized.
pub async fn render_page(
    path: &Path,
    chunks: &[Chunk],
    page: u32,
    print_text: bool,
    rasterizer: &dyn PageRasterizer,
) -> Result<RenderedPage, RenderError> {
    if page == 0 {
        return Err(RenderError::InvalidPage(page));
    }
    let segments = segments_for_page(chunks, page);
    let mut image = rasterizer.rasterize(path, page).await?;
    let legend = draw_overlay(&mut image, &segments);

    if print_text {
        for s in &segments {
            println!("{}\n", s.content);
        }
    }

    info!(
        page,
        segments = segments.len(),
        width = image.width(),
        height = image.height(),
        "page rendered"
    );
    Ok(RenderedPage { image, legend })
}

/// Rasterizes 1-based `page` of `path` and returns it as a base64-encoded PNG.
///
/// # Errors
/// [`RenderError`] when the page cannot be rasterized or encoded.
pub async fn page_to_base64_png(
    path: &Path,
    page: u32,
    rasterizer: &dyn PageRasterizer,
) -> Result<String, RenderError> {
    if page == 0 {
        return Err(RenderError::InvalidPage(page));
    }
    let image = rasterizer.rasterize(path, page).await?;

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    debug!(page, bytes = png.len(), "page encoded as png");

    Ok(STANDARD.encode(&png))
}
