//! Two-pass pagination resolver
//!
//! The table of contents needs the physical page each chapter lands on, but
//! page counts depend on text reflow, image sizing, and page-break rules
//! that are only known after layout. The resolver therefore works from a
//! pre-render pass: the book is laid out once without a table of contents
//! and with a machine-readable marker embedded in every chapter heading,
//! and the marker positions are read back out of the resulting PDF.
//!
//! When the pre-render pass is unavailable the resolver falls back to
//! [`StaticFormula`], a fixed-shape estimate that is documented as
//! approximate: it is wrong whenever a chapter's real rendered length
//! differs from the assumed fixed page count.

use std::collections::BTreeMap;
use std::fmt;

use log::{info, warn};

use crate::book::Chapter;
use crate::error::Result;

/// Marker string embedded in a chapter heading during the pre-render pass
///
/// The closing bracket keeps id 1 from matching inside id 12.
pub fn marker(id: u32) -> String {
    format!("[PAGE:{id}]")
}

/// Fixed-shape page estimate used when marker extraction is unavailable
///
/// Assumes `front_matter_pages` pages before the first chapter (cover,
/// author page, contents) and exactly `pages_per_chapter` pages per chapter
/// (image page plus content page). The estimate drifts as soon as any
/// chapter reflows longer or shorter than that, so results from this path
/// are approximations, not authoritative page numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticFormula {
    /// Pages before the first chapter
    pub front_matter_pages: usize,
    /// Assumed pages occupied by each chapter
    pub pages_per_chapter: usize,
}

impl Default for StaticFormula {
    fn default() -> Self {
        Self {
            front_matter_pages: 3,
            pages_per_chapter: 2,
        }
    }
}

impl StaticFormula {
    /// Estimated page for the chapter at 1-based position `index`
    ///
    /// Positions index the input sequence, not chapter ids, so gapped id
    /// numbering does not distort the estimate.
    pub fn page_for_index(&self, index: usize) -> usize {
        self.front_matter_pages + (index - 1) * self.pages_per_chapter + 1
    }
}

/// Which strategy produced a [`Resolution`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Markers located in the extracted text of the pre-render PDF
    MarkerExtraction,
    /// Every page number estimated by the static formula
    StaticFormula,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::MarkerExtraction => "marker extraction",
            Strategy::StaticFormula => "static formula",
        };
        write!(f, "{name}")
    }
}

/// The resolver's output: a total mapping from chapter id to page number
#[derive(Debug, Clone)]
pub struct Resolution {
    /// 1-based physical page number for every chapter id in the input
    pub pages: BTreeMap<u32, usize>,
    /// Strategy that produced the mapping
    pub strategy: Strategy,
}

/// Scan extracted page texts for chapter markers
///
/// Pages are scanned in order and the first page containing a chapter's
/// marker wins, which also settles the case of a heading splitting across a
/// page boundary: the first page carrying any occurrence of the marker is
/// that chapter's page. Returns a partial map; chapters whose marker never
/// appears are absent.
pub fn extract_marker_pages(pages: &[String], chapters: &[Chapter]) -> BTreeMap<u32, usize> {
    let mut found = BTreeMap::new();
    for (page_index, text) in pages.iter().enumerate() {
        for chapter in chapters {
            if !found.contains_key(&chapter.id) && text.contains(&marker(chapter.id)) {
                found.insert(chapter.id, page_index + 1);
            }
        }
    }
    found
}

/// Resolve a page number for every chapter
///
/// `prerender` is the outcome of the pre-render pass: the per-page extracted
/// text of the laid-out document, or the error that kept it from
/// materializing. A failed pass degrades to the static formula for the whole
/// map; a successful pass fills gaps (markers that never surfaced) with the
/// formula estimate for that chapter's position. The strategy used is logged
/// and recorded in the result.
pub fn resolve(
    chapters: &[Chapter],
    prerender: Result<Vec<String>>,
    formula: &StaticFormula,
) -> Resolution {
    match prerender {
        Ok(page_texts) => {
            let found = extract_marker_pages(&page_texts, chapters);
            let mut pages = BTreeMap::new();
            let mut estimated = 0usize;

            for (position, chapter) in chapters.iter().enumerate() {
                let page = found.get(&chapter.id).copied().unwrap_or_else(|| {
                    estimated += 1;
                    formula.page_for_index(position + 1)
                });
                pages.insert(chapter.id, page);
            }

            if estimated > 0 {
                warn!(
                    "{estimated} of {} chapter markers missing from the pre-render \
                     output; using formula estimates for those chapters",
                    chapters.len()
                );
            }
            info!(
                "page numbers resolved via marker extraction ({} chapters, {} pages scanned)",
                chapters.len(),
                page_texts.len()
            );

            Resolution {
                pages,
                strategy: Strategy::MarkerExtraction,
            }
        }
        Err(e) => {
            warn!("pre-render pass failed: {e}; falling back to the static page formula");
            let pages = chapters
                .iter()
                .enumerate()
                .map(|(position, chapter)| (chapter.id, formula.page_for_index(position + 1)))
                .collect();
            Resolution {
                pages,
                strategy: Strategy::StaticFormula,
            }
        }
    }
}

/// Write resolved page numbers into the chapter list
///
/// Consumes and returns the chapters so the final render sees an updated
/// value rather than shared mutable state.
pub fn apply(mut chapters: Vec<Chapter>, resolution: &Resolution) -> Vec<Chapter> {
    for chapter in &mut chapters {
        chapter.page = resolution.pages.get(&chapter.id).copied();
    }
    chapters
}
