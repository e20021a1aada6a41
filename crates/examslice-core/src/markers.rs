//! Layout detection: question-start markers and page-footer positions.
//!
//! Scans the collaborator-supplied word layout for `Q<n>.` tokens and for
//! page numbers in the bottom band of each page. Detection never fails: a
//! document with no recognizable markers simply yields an empty list, and
//! callers fall back to manual correction.

use std::sync::LazyLock;

use regex::Regex;

use crate::layout::DocumentLayout;

/// Detected start position of one question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestionMarker {
    pub question_num: u32,
    pub page_num: usize,
    /// Vertical position in geometric units (same units as [`LayoutWord::top`]).
    ///
    /// [`LayoutWord::top`]: crate::layout::LayoutWord::top
    pub top: f64,
}

// Anchored at both ends: a question label is its own token ("Q12."), never
// part of a larger word, and the trailing dot distinguishes it from stray
// line or footer digits.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Q(\d+)\.$").unwrap());

// Bare or dash-wrapped integers ("12", "-12-"), matched after stripping
// interior spaces ("- 12 -").
static FOOTER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+-?$").unwrap());

/// Detect question-start markers across the whole document.
///
/// Output is sorted by `question_num` ascending, not by discovery order:
/// extraction follows reading order, which can interleave with true numeric
/// order on multi-column or OCR-reordered pages, and everything downstream
/// indexes crops by numeric order. Duplicate question numbers keep the first
/// occurrence, so numbers are unique in the result.
pub fn detect_markers(layout: &DocumentLayout) -> Vec<QuestionMarker> {
    let mut markers = Vec::new();

    for (page_num, page) in layout.pages.iter().enumerate() {
        for word in &page.words {
            if let Some(caps) = MARKER_RE.captures(&word.text) {
                // Numbers beyond u32 are garbage tokens, not questions.
                if let Ok(question_num) = caps[1].parse::<u32>() {
                    markers.push(QuestionMarker {
                        question_num,
                        page_num,
                        top: word.top,
                    });
                }
            }
        }
    }

    markers.sort_by_key(|m| m.question_num);
    markers.dedup_by_key(|m| m.question_num);
    markers
}

/// Detect the page-number Y position for each page, where present.
///
/// Only the bottom `footer_band` fraction of each page is searched (the
/// footer region); the first matching token wins per page. Returns one entry
/// per page, `None` where no footer was found.
pub fn detect_footers(layout: &DocumentLayout, footer_band: f64) -> Vec<Option<f64>> {
    layout
        .pages
        .iter()
        .map(|page| {
            let threshold = page.height * (1.0 - footer_band);
            page.words.iter().find_map(|word| {
                if word.top <= threshold {
                    return None;
                }
                let stripped: String = word.text.chars().filter(|c| *c != ' ').collect();
                FOOTER_RE.is_match(&stripped).then_some(word.top)
            })
        })
        .collect()
}
