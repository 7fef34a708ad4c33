//! Biography data model and loader
//!
//! The input document is a JSON file of the shape:
//!
//! ```json
//! {
//!   "book_info": { "title": "...", "author": "..." },
//!   "chapters": [
//!     {
//!       "id": 1,
//!       "title": "...",
//!       "content": ["paragraph", "..."],
//!       "images": [{ "url": "...", "alt": "...", "caption": "..." }],
//!       "qr_link": "https://..."
//!     }
//!   ]
//! }
//! ```
//!
//! Loading has no side effects. The `qr_code` and `page` fields are never
//! read from the document; they are filled in by the asset and pagination
//! stages, each of which returns an updated chapter list rather than
//! mutating shared state.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Book-level metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookInfo {
    /// Book title, shown on the cover and in PDF metadata
    pub title: String,
    /// Author name
    pub author: String,
    /// Optional paragraphs for the about-the-author front-matter page
    #[serde(default)]
    pub about: Vec<String>,
}

/// An image belonging to a chapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterImage {
    /// Source path or URL, resolved against the pipeline's base directory
    pub url: String,
    /// Alt text
    #[serde(default)]
    pub alt: String,
    /// Caption rendered under the figure
    #[serde(default)]
    pub caption: String,
}

/// A single chapter of the biography
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    /// Unique, ordered sequence id. Stable across both rendering passes.
    pub id: u32,
    /// Chapter title, shown in the heading and the table of contents
    pub title: String,
    /// Ordered paragraphs of body text
    #[serde(default)]
    pub content: Vec<String>,
    /// Ordered images, rendered after the body text
    #[serde(default)]
    pub images: Vec<ChapterImage>,
    /// Optional external link to encode as a QR image
    #[serde(default)]
    pub qr_link: Option<String>,
    /// Path of the QR asset for this chapter, filled by the asset stage
    #[serde(default)]
    pub qr_code: Option<String>,
    /// Resolved 1-based physical page number, filled by the resolver
    #[serde(default)]
    pub page: Option<usize>,
}

/// A loaded biography: metadata plus the ordered chapter list
#[derive(Debug, Clone, Deserialize)]
pub struct Biography {
    pub book_info: BookInfo,
    pub chapters: Vec<Chapter>,
}

/// Load and validate a biography document
///
/// Fails if the file is absent, the JSON is malformed or missing required
/// fields, the title or author is empty, the chapter list is empty, or two
/// chapters share an id.
pub fn load(path: &Path) -> Result<Biography> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let biography: Biography = serde_json::from_reader(BufReader::new(file))?;

    validate(&biography)?;

    Ok(biography)
}

/// Semantic checks the parser can't express
fn validate(biography: &Biography) -> Result<()> {
    if biography.book_info.title.trim().is_empty() {
        return Err(Error::Data("book title is empty".to_string()));
    }
    if biography.book_info.author.trim().is_empty() {
        return Err(Error::Data("book author is empty".to_string()));
    }
    if biography.chapters.is_empty() {
        return Err(Error::Data("chapter list is empty".to_string()));
    }

    let mut seen = HashSet::new();
    for chapter in &biography.chapters {
        if !seen.insert(chapter.id) {
            return Err(Error::Data(format!(
                "duplicate chapter id: {}",
                chapter.id
            )));
        }
    }

    Ok(())
}
