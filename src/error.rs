//! Error types for the memoir-press library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the memoir-press library
///
/// Variants group into four classes with different propagation policies:
/// data errors ([`Data`](Error::Data), [`Json`](Error::Json),
/// [`FileNotFound`](Error::FileNotFound)) and template errors
/// ([`Template`](Error::Template)) abort the run; asset errors
/// ([`Asset`](Error::Asset)) are recovered locally by falling back to the
/// shared default asset; render errors ([`Render`](Error::Render),
/// [`Pdf`](Error::Pdf)) are fatal on the final pass but degrade the
/// pre-render pass to the static page formula.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input document (semantic problems the parser can't catch)
    #[error("data error: {0}")]
    Data(String),

    /// Malformed input document or missing required fields
    #[error("data error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template missing, unparsable, or referencing undefined fields
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// QR asset generation failure (recovered with the default asset)
    #[error("asset error: {0}")]
    Asset(String),

    /// HTML-to-PDF rendering failure
    #[error("render error: {0}")]
    Render(String),

    /// PDF parsing error from the pre-render pass
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Rendered PDF came back without pages
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),
}
