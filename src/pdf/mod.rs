//! PDF emission and inspection module

pub mod emit;
pub mod text;

// Re-export commonly used items
pub use emit::{html_to_pdf, PdfQuality};
pub use text::{count_pages, page_texts};
