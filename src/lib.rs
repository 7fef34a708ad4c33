//! Memoir Press Library
//!
//! A library for rendering a biography described in JSON into a paginated
//! PDF book with an accurate table of contents. This library provides
//! functionality to:
//! - Load and validate biography documents
//! - Generate per-chapter QR code assets with a shared fallback
//! - Render Jinja-style HTML templates in three style variants
//! - Resolve chapter page numbers with a two-pass pre-render
//! - Emit the final PDF through the WeasyPrint renderer
//!
//! # Example
//!
//! ```no_run
//! use memoir_press::paginate::StaticFormula;
//! use memoir_press::pdf::PdfQuality;
//! use memoir_press::pipeline::{run, RenderConfig};
//! use memoir_press::template::StyleVariant;
//! use std::path::PathBuf;
//!
//! let config = RenderConfig {
//!     input: PathBuf::from("biography.json"),
//!     template_dir: PathBuf::from("templates"),
//!     output: PathBuf::from("output/memoir.pdf"),
//!     style: StyleVariant::Book,
//!     assets_dir: PathBuf::from("qr_codes"),
//!     default_asset: PathBuf::from("qrcode.jpg"),
//!     base_dir: PathBuf::from("."),
//!     quality: PdfQuality::default(),
//!     formula: StaticFormula::default(),
//! };
//!
//! let summary = run(&config).expect("failed to render the book");
//! println!("{} pages", summary.page_count);
//! ```

pub mod assets;
pub mod book;
pub mod error;
pub mod layout;
pub mod paginate;
pub mod pdf;
pub mod pipeline;
pub mod template;

// Re-export commonly used items
pub use error::{Error, Result};
