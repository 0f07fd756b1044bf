//! Bounding-box overlay for one page.

use doc_loader::Chunk;
use image::{Rgba, RgbaImage};
use tracing::debug;

pub const TEXT_COLOR: Rgba<u8> = Rgba([0, 191, 255, 255]); // deepskyblue
pub const TITLE_COLOR: Rgba<u8> = Rgba([218, 112, 214, 255]); // orchid
pub const IMAGE_COLOR: Rgba<u8> = Rgba([34, 139, 34, 255]); // forestgreen
pub const TABLE_COLOR: Rgba<u8> = Rgba([255, 99, 71, 255]); // tomato

const STROKE: i64 = 2;
const SWATCH: u32 = 14;

/// One legend line: category label and its stroke color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: &'static str,
    pub color: Rgba<u8>,
}

pub fn color_for(category: Option<&str>) -> Rgba<u8> {
    match category {
        Some("Title") => TITLE_COLOR,
        Some("Image") => IMAGE_COLOR,
        Some("Table") => TABLE_COLOR,
        _ => TEXT_COLOR,
    }
}

/// Chunks whose `page_number` equals `page`, in reading order.
pub fn segments_for_page(chunks: &[Chunk], page: u32) -> Vec<&Chunk> {
    chunks
        .iter()
        .filter(|c| c.page_number() == Some(i64::from(page)))
        .collect()
}

/// Legend for `segments`: `Text` first, then `Title`, `Image`, `Table`
/// when one of the segments has that category.
pub fn legend_for(segments: &[&Chunk]) -> Vec<LegendEntry> {
    let mut legend = vec![LegendEntry {
        label: "Text",
        color: TEXT_COLOR,
    }];
    for (label, color) in [
        ("Title", TITLE_COLOR),
        ("Image", IMAGE_COLOR),
        ("Table", TABLE_COLOR),
    ] {
        if segments.iter().any(|s| s.category() == Some(label)) {
            legend.push(LegendEntry { label, color });
        }
    }
    legend
}

/// Strokes each segment's polygon onto `img` and returns the legend.
///
/// Points are mapped from the layout space to the image by
/// `(img_w / layout_width, img_h / layout_height)`. Segments without
/// usable coordinates are skipped.
pub fn draw_overlay(img: &mut RgbaImage, segments: &[&Chunk]) -> Vec<LegendEntry> {
    let (w, h) = img.dimensions();
    for seg in segments {
        let Some(coords) = seg.coordinates() else {
            debug!(category = ?seg.category(), "segment has no coordinates, skipped");
            continue;
        };
        if coords.points.len() < 2 || coords.layout_width <= 0.0 || coords.layout_height <= 0.0 {
            debug!(points = coords.points.len(), "degenerate polygon, skipped");
            continue;
        }

        let sx = f64::from(w) / coords.layout_width;
        let sy = f64::from(h) / coords.layout_height;
        let pts: Vec<(i64, i64)> = coords
            .points
            .iter()
            .map(|&(x, y)| ((x * sx).round() as i64, (y * sy).round() as i64))
            .collect();

        let color = color_for(seg.category());
        for (i, &a) in pts.iter().enumerate() {
            let b = pts[(i + 1) % pts.len()];
            draw_line(img, a, b, color);
        }
    }

    let legend = legend_for(segments);
    draw_legend(img, &legend);
    legend
}

fn put(img: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && x < i64::from(img.width()) && y < i64::from(img.height()) {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham line, `STROKE` pixels thick.
fn draw_line(img: &mut RgbaImage, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: Rgba<u8>) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let step_x = if x0 < x1 { 1 } else { -1 };
    let step_y = if y0 < y1 { 1 } else { -1 };
    let (mut x, mut y, mut err) = (x0, y0, dx + dy);
    loop {
        for o in 0..STROKE {
            put(img, x + o, y, color);
            put(img, x, y + o, color);
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += step_x;
        }
        if e2 <= dx {
            err += dx;
            y += step_y;
        }
    }
}

/// Filled color swatches stacked in the top-right corner.
fn draw_legend(img: &mut RgbaImage, legend: &[LegendEntry]) {
    let right = img.width().saturating_sub(4);
    for (row, entry) in legend.iter().enumerate() {
        let top = 4 + row as u32 * (SWATCH + 4);
        for y in top..top + SWATCH {
            for x in right.saturating_sub(SWATCH)..right {
                put(img, i64::from(x), i64::from(y), entry.color);
            }
        }
    }
}
