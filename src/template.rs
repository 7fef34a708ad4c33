//! HTML template rendering
//!
//! One Tera template per style variant serves both layout passes: the
//! pre-render pass omits the table of contents and embeds a page marker in
//! every chapter heading, and the final pass renders the table of contents
//! from the resolved page numbers. Using a single template for both passes
//! keeps their layout identical, which is what makes the extracted page
//! numbers valid for the final document.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::Datelike;
use tera::{Context, Tera};

use crate::book::{BookInfo, Chapter};
use crate::error::{Error, Result};
use crate::layout::PageDimensions;

/// Layout/style variant, selected by name on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleVariant {
    /// Decorated pocket book (140mm × 210mm) with chapter image spreads
    Book,
    /// Plain A4 single-flow layout
    Reference,
    /// Minimal serif A5 layout
    Classic,
}

impl StyleVariant {
    /// Template file name within the template directory
    pub fn template_name(&self) -> &'static str {
        match self {
            StyleVariant::Book => "book.html",
            StyleVariant::Reference => "reference.html",
            StyleVariant::Classic => "classic.html",
        }
    }

    /// Page size for this variant
    pub fn page_size(&self) -> PageDimensions {
        match self {
            StyleVariant::Book => PageDimensions::pocket(),
            StyleVariant::Reference => PageDimensions::a4(),
            StyleVariant::Classic => PageDimensions::a5(),
        }
    }
}

impl fmt::Display for StyleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StyleVariant::Book => "book",
            StyleVariant::Reference => "reference",
            StyleVariant::Classic => "classic",
        };
        write!(f, "{name}")
    }
}

impl FromStr for StyleVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "book" => Ok(StyleVariant::Book),
            "reference" => Ok(StyleVariant::Reference),
            "classic" => Ok(StyleVariant::Classic),
            other => Err(Error::Data(format!(
                "unknown style variant: {other} (expected book, reference, or classic)"
            ))),
        }
    }
}

/// Which of the two layout passes is being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Table of contents omitted, page markers embedded in headings
    PreRender,
    /// Table of contents populated from resolved page numbers
    Final,
}

/// Merge the book data into the variant's template
///
/// Pure apart from reading the template file. Fails if the template is
/// missing, unparsable, or references fields absent from the data. Rendering
/// the same inputs twice yields byte-identical output.
pub fn render(
    template_dir: &Path,
    variant: StyleVariant,
    mode: RenderMode,
    book_info: &BookInfo,
    chapters: &[Chapter],
) -> Result<String> {
    let path = template_dir.join(variant.template_name());
    if !path.exists() {
        return Err(Error::FileNotFound(path));
    }

    let mut tera = Tera::default();
    tera.add_template_file(&path, Some(variant.template_name()))?;

    let context = build_context(variant, mode, book_info, chapters);
    let html = tera.render(variant.template_name(), &context)?;
    Ok(html)
}

fn build_context(
    variant: StyleVariant,
    mode: RenderMode,
    book_info: &BookInfo,
    chapters: &[Chapter],
) -> Context {
    let page = variant.page_size();
    let mut context = Context::new();
    context.insert("book_info", book_info);
    context.insert("chapters", chapters);
    context.insert("prerender", &matches!(mode, RenderMode::PreRender));
    context.insert("page_width_mm", &(page.width.mm().round() as u64));
    context.insert("page_height_mm", &(page.height.mm().round() as u64));
    context.insert("generated_year", &chrono::Local::now().year());
    context
}
