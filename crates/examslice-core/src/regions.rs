//! Region calculation: turning sorted question markers into crop geometry,
//! including spans across one or more page breaks.
//!
//! The calculator is a pure function of (markers, page dimensions, footers,
//! config). Recomputing a single question, the reset operation, therefore
//! reproduces the batch pass bit for bit.

use crate::geometry::{CropRegion, PageGeometry, PageSpan, clamp_span};
use crate::markers::QuestionMarker;

/// Layout constants for region calculation.
///
/// The margins are empirically tuned against rendered exam pages and are a
/// tuning surface, not an invariant; documents with different page geometry
/// may need different values.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Raster resolution the pages were rendered at; the scale factor from
    /// geometric units to pixels is `dpi / 72`.
    pub dpi: f64,
    /// Pixels of lead-in kept above the question label.
    pub lead_margin: i32,
    /// Pixels trimmed above the next question's label.
    pub next_margin: i32,
    /// Pixels trimmed above a detected page footer.
    pub footer_margin: i32,
    /// Pixels trimmed from the page bottom when no footer was detected.
    pub bottom_margin: i32,
    /// Top margin of continuation spans, clearing the page header.
    pub top_margin: i32,
    /// Horizontal margin on both page edges.
    pub side_margin: i32,
    /// Gap kept below a region extended to the physical page bottom.
    pub extend_margin: i32,
    /// Floor for collapsed degenerate spans.
    pub min_span_height: i32,
    /// Fraction of the page height searched for footers, from the bottom.
    pub footer_band: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            dpi: 150.0,
            lead_margin: 10,
            next_margin: 15,
            footer_margin: 20,
            bottom_margin: 50,
            top_margin: 50,
            side_margin: 30,
            extend_margin: 30,
            min_span_height: 50,
            footer_band: 0.10,
        }
    }
}

impl LayoutConfig {
    /// Scale factor from geometric units to raster pixels.
    pub fn scale(&self) -> f64 {
        self.dpi / 72.0
    }
}

/// Compute crop regions for every marker.
///
/// Markers must be sorted by question number (as produced by
/// [`detect_markers`]). Markers referencing pages outside `pages` are
/// skipped.
///
/// [`detect_markers`]: crate::markers::detect_markers
pub fn compute_regions(
    markers: &[QuestionMarker],
    pages: &[PageGeometry],
    footers: &[Option<f64>],
    config: &LayoutConfig,
) -> Vec<CropRegion> {
    (0..markers.len())
        .filter_map(|i| compute_region(i, markers, pages, footers, config))
        .collect()
}

/// Compute the crop region for marker `i` alone.
///
/// This is also the reset operation: it depends on nothing but the inputs,
/// so resetting a question after manual edits reproduces the original
/// auto-detected geometry exactly.
pub fn compute_region(
    i: usize,
    markers: &[QuestionMarker],
    pages: &[PageGeometry],
    footers: &[Option<f64>],
    config: &LayoutConfig,
) -> Option<CropRegion> {
    let marker = markers.get(i)?;
    let page = pages.get(marker.page_num)?;
    let scale = config.scale();
    let px = |units: f64| (units * scale) as i32;

    let page_height = page.height as i32;
    let anchor = (px(marker.top) - config.lead_margin).max(0);

    // Footer cut for a page: detected footer minus margin, if any.
    let footer_px = |page_num: usize| -> Option<i32> {
        footers
            .get(page_num)
            .copied()
            .flatten()
            .map(|top| px(top) - config.footer_margin)
    };
    // End-of-content cut when a question runs off a page: the footer cut or
    // the page bottom, whichever is higher.
    let page_cut = |page_num: usize| -> Option<i32> {
        let height = pages.get(page_num)?.height as i32;
        let bottom = height - config.bottom_margin;
        Some(match footer_px(page_num) {
            Some(cut) => cut.min(bottom),
            None => bottom,
        })
    };

    // End boundary: the next marker, or for the last question the final
    // page's footer (or bottom).
    let (end_page, end_y) = match markers.get(i + 1) {
        Some(next) => (next.page_num, px(next.top) - config.next_margin),
        None => {
            let last = pages.len().checked_sub(1)?;
            let height = pages[last].height as i32;
            let cut = footer_px(last).unwrap_or(height - config.bottom_margin);
            (last, cut)
        }
    };

    let (y2, extra_pages) = if end_page <= marker.page_num {
        // Same page; numbering anomalies (next marker on an earlier page)
        // also collapse to a single-page region.
        let y2 = if end_page == marker.page_num {
            end_y
        } else {
            page_cut(marker.page_num)?
        };
        (y2, Vec::new())
    } else {
        // Page break: the first page runs to its own footer or bottom, and
        // every following page contributes a header-clearing span.
        let mut extra = Vec::new();
        for mid in marker.page_num + 1..end_page {
            extra.push(PageSpan::new(mid, config.top_margin, page_cut(mid)?));
        }
        extra.push(PageSpan::new(end_page, config.top_margin, end_y));
        (page_cut(marker.page_num)?, extra)
    };

    let (y1, y2) = clamp_span(anchor, y2, page_height, anchor, config.min_span_height);

    let extra_pages: Vec<PageSpan> = extra_pages
        .into_iter()
        .filter_map(|span| {
            let height = pages.get(span.page_num)?.height as i32;
            let (y1, y2) = clamp_span(
                span.y1,
                span.y2,
                height,
                config.top_margin,
                config.min_span_height,
            );
            Some(PageSpan::new(span.page_num, y1, y2))
        })
        .collect();

    let (mut x1, mut x2) = (config.side_margin, page.width as i32 - config.side_margin);
    if x2 <= x1 {
        // Page narrower than both margins: fall back to full width.
        (x1, x2) = (0, page.width as i32);
    }

    Some(CropRegion {
        question_num: marker.question_num,
        page_num: marker.page_num,
        x1,
        y1,
        x2,
        y2,
        confirmed: false,
        extra_pages,
    })
}
