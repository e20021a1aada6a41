//! Shared fixture for CLI integration tests: one synthetic rendered
//! document under a temp project root.

use std::path::Path;

use assert_cmd::Command;
use image::{Rgb, RgbImage};

pub fn cmd() -> Command {
    Command::cargo_bin("examslice").unwrap()
}

/// Write a one-page document `2024S_A` rendered at scale 1.0 (dpi 72):
/// an 800x1000 raster and a layout with two questions and a page footer.
///
/// Expected geometry at `--dpi 72`: Q1 spans rows 90..585, Q2 spans rows
/// 590..930 (footer at 950 minus the footer margin).
pub fn write_fixture(root: &Path) {
    let doc_dir = root.join("documents/2024S_A");
    let pages_dir = doc_dir.join("pages");
    std::fs::create_dir_all(&pages_dir).unwrap();

    let layout = serde_json::json!({
        "pages": [
            {
                "height": 1000.0,
                "words": [
                    {"text": "Q1.", "top": 100.0},
                    {"text": "Which", "top": 100.0},
                    {"text": "Q2.", "top": 600.0},
                    {"text": "Next", "top": 600.0},
                    {"text": "-1-", "top": 950.0},
                ],
            }
        ]
    });
    std::fs::write(
        doc_dir.join("layout.json"),
        serde_json::to_vec(&layout).unwrap(),
    )
    .unwrap();

    let mut page = RgbImage::from_pixel(800, 1000, Rgb([255, 255, 255]));
    for &y in &[120u32, 620] {
        for x in 0..800 {
            page.put_pixel(x, y, Rgb([0, 0, 0]));
        }
    }
    page.save(pages_dir.join("page_000.png")).unwrap();
}
