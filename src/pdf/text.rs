//! PDF page counting and text extraction
//!
//! The resolver reads the pre-render PDF back through lopdf to find its
//! chapter markers; the pipeline uses the page count for the run summary.

use std::path::Path;

use lopdf::Document;

use crate::error::{Error, Result};

/// Count pages by reading the Count field from the Pages dictionary
///
/// More reliable than counting `get_pages()` entries when the renderer
/// emits a nested page tree.
fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let root_id = doc
        .trailer
        .get(b"Root")
        .map_err(|_| Error::Render("PDF has no Root in trailer".to_string()))?
        .as_reference()?;
    let catalog = doc.get_object(root_id)?.as_dict()?;
    let pages_id = catalog.get(b"Pages")?.as_reference()?;
    let pages = doc.get_object(pages_id)?.as_dict()?;
    let count = pages.get(b"Count")?.as_i64()?;
    Ok(count as usize)
}

/// Count the number of pages in a PDF file
pub fn count_pages(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let page_count = count_pages_from_catalog(&doc)?;

    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(page_count)
}

/// Extract the text of every page, in page order
///
/// A page whose text cannot be decoded (image-only pages, unusual font
/// encodings) yields an empty string rather than failing the pass; chapters
/// whose markers land on such pages fall back to the formula estimate.
pub fn page_texts(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let texts = doc
        .get_pages()
        .keys()
        .map(|&page_number| doc.extract_text(&[page_number]).unwrap_or_default())
        .collect();

    Ok(texts)
}
