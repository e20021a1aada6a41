//! Image compositing: rendering one crop region, possibly spanning several
//! pages, into a single trimmed raster.
//!
//! Composition is a pure function of the page rasters, the region, and a
//! [`TrimConfig`]; identical inputs produce byte-identical output.

use image::{Rgb, RgbImage, imageops};

use examslice_core::CropRegion;

use crate::error::{PipelineError, Result};

/// Whitespace-trimming constants.
///
/// Like the layout margins, these are empirically tuned against 150 dpi exam
/// scans and are a tuning surface rather than an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimConfig {
    /// Grayscale value below which a pixel counts as content.
    pub brightness_threshold: u8,
    /// Rows kept below the last content row.
    pub bottom_padding: u32,
    /// Bottom trimming only happens when it would remove more than this.
    pub min_bottom_trim: u32,
    /// Rows kept above the first content row of a continuation span.
    pub top_margin: u32,
    /// Top trimming only happens when it would remove more than this.
    pub min_top_trim: u32,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            brightness_threshold: 245,
            bottom_padding: 70,
            min_bottom_trim: 60,
            top_margin: 10,
            min_top_trim: 30,
        }
    }
}

fn luma(px: &Rgb<u8>) -> u8 {
    let [r, g, b] = px.0;
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}

fn row_has_content(img: &RgbImage, y: u32, threshold: u8) -> bool {
    (0..img.width()).any(|x| luma(img.get_pixel(x, y)) < threshold)
}

/// Trim trailing whitespace rows, keeping generous padding below the last
/// content row. Only trims when the removable whitespace is substantial, so
/// short questions are not cropped to the pixel.
pub fn trim_bottom(img: RgbImage, config: &TrimConfig) -> RgbImage {
    let last = (0..img.height())
        .rev()
        .find(|&y| row_has_content(&img, y, config.brightness_threshold));
    let Some(last) = last else {
        // All white, keep as-is.
        return img;
    };

    let new_height = (last + config.bottom_padding).min(img.height());
    if img.height() - new_height > config.min_bottom_trim {
        return imageops::crop_imm(&img, 0, 0, img.width(), new_height).to_image();
    }
    img
}

/// Trim leading whitespace rows, keeping a small margin above the first
/// content row. Used on continuation spans so a mostly empty page top does
/// not widen the gap at a page join.
pub fn trim_top(img: RgbImage, config: &TrimConfig) -> RgbImage {
    let first = (0..img.height()).find(|&y| row_has_content(&img, y, config.brightness_threshold));
    let Some(first) = first else {
        return img;
    };

    let new_top = first.saturating_sub(config.top_margin);
    if new_top > config.min_top_trim {
        return imageops::crop_imm(&img, 0, new_top, img.width(), img.height() - new_top)
            .to_image();
    }
    img
}

fn crop_span(pages: &[RgbImage], page_num: usize, x1: i32, x2: i32, y1: i32, y2: i32) -> Result<RgbImage> {
    let page = pages.get(page_num).ok_or(PipelineError::MissingPage {
        page_num,
        page_count: pages.len(),
    })?;

    let x1 = x1.clamp(0, page.width() as i32) as u32;
    let x2 = x2.clamp(0, page.width() as i32) as u32;
    let y1 = y1.clamp(0, page.height() as i32) as u32;
    let y2 = y2.clamp(0, page.height() as i32) as u32;
    if x2 <= x1 || y2 <= y1 {
        return Err(PipelineError::InvalidRegion(format!(
            "page {page_num}: ({x1},{y1})..({x2},{y2}) is empty"
        )));
    }

    Ok(imageops::crop_imm(page, x1, y1, x2 - x1, y2 - y1).to_image())
}

/// Render one crop region to a single image.
///
/// The primary span is cropped and bottom-trimmed; each extra span reuses
/// the primary's horizontal bounds and is trimmed top and bottom. Spans are
/// then stacked left-aligned on a white canvas of the union width, and the
/// result gets one final bottom trim.
pub fn compose(pages: &[RgbImage], region: &CropRegion, config: &TrimConfig) -> Result<RgbImage> {
    let primary = crop_span(
        pages,
        region.page_num,
        region.x1,
        region.x2,
        region.y1,
        region.y2,
    )?;
    let mut parts = vec![trim_bottom(primary, config)];

    for span in &region.extra_pages {
        let cropped = crop_span(pages, span.page_num, region.x1, region.x2, span.y1, span.y2)?;
        parts.push(trim_bottom(trim_top(cropped, config), config));
    }

    let combined = if parts.len() == 1 {
        parts.remove(0)
    } else {
        let width = parts.iter().map(RgbImage::width).max().unwrap_or(1);
        let height: u32 = parts.iter().map(RgbImage::height).sum();
        let mut canvas = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

        let mut y = 0i64;
        for part in &parts {
            imageops::replace(&mut canvas, part, 0, y);
            y += part.height() as i64;
        }
        canvas
    };

    Ok(trim_bottom(combined, config))
}
