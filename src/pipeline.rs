//! Pipeline orchestration
//!
//! Runs the stages strictly in sequence, threading each stage's result into
//! the next: load, QR assets, pre-render, page resolution, final render,
//! PDF emission. Two full layout passes per invocation is the price of an
//! accurate table of contents.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::assets::{self, AssetOptions};
use crate::book::{self, Biography, BookInfo, Chapter};
use crate::error::Result;
use crate::paginate::{self, StaticFormula, Strategy};
use crate::pdf::{self, PdfQuality};
use crate::template::{self, RenderMode, StyleVariant};

/// Everything one pipeline run needs
///
/// The caller (normally the CLI) owns path and quality decisions; the
/// pipeline itself has no hardcoded locations.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Biography document to load
    pub input: PathBuf,
    /// Directory holding the style variant templates
    pub template_dir: PathBuf,
    /// Final PDF path; debug and pre-render artifacts land next to it
    pub output: PathBuf,
    /// Layout/style variant
    pub style: StyleVariant,
    /// Directory generated QR images are written to
    pub assets_dir: PathBuf,
    /// Shared fallback QR asset
    pub default_asset: PathBuf,
    /// Base directory for relative asset references in the markup
    pub base_dir: PathBuf,
    /// Image quality and resolution settings for both layout passes
    pub quality: PdfQuality,
    /// Fallback page-number formula parameters
    pub formula: StaticFormula,
}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct RenderSummary {
    /// Final PDF path
    pub output: PathBuf,
    /// Debug markup sibling written before emission
    pub debug_html: PathBuf,
    /// Page count of the emitted PDF
    pub page_count: usize,
    /// Pagination strategy that produced the table of contents
    pub strategy: Strategy,
}

/// Run the full pipeline for one biography document
pub fn run(config: &RenderConfig) -> Result<RenderSummary> {
    let Biography {
        book_info,
        chapters,
    } = book::load(&config.input)?;
    info!(
        "loaded \"{}\" by {} ({} chapters)",
        book_info.title,
        book_info.author,
        chapters.len()
    );

    let chapters = assets::attach_qr_codes(
        chapters,
        &AssetOptions {
            dir: config.assets_dir.clone(),
            default_asset: config.default_asset.clone(),
        },
    );

    if let Some(parent) = config.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let prerender = prerender_page_texts(&book_info, &chapters, config);
    let resolution = paginate::resolve(&chapters, prerender, &config.formula);
    let chapters = paginate::apply(chapters, &resolution);

    let html = template::render(
        &config.template_dir,
        config.style,
        RenderMode::Final,
        &book_info,
        &chapters,
    )?;
    let debug_html = sibling(&config.output, "_debug.html");
    fs::write(&debug_html, &html)?;

    pdf::html_to_pdf(&debug_html, &config.output, &config.base_dir, &config.quality)?;
    let page_count = pdf::count_pages(&config.output)?;

    Ok(RenderSummary {
        output: config.output.clone(),
        debug_html,
        page_count,
        strategy: resolution.strategy,
    })
}

/// Run the pre-render pass and extract its per-page text
///
/// Any failure here is handed to the resolver, which degrades to the static
/// formula instead of aborting the run.
fn prerender_page_texts(
    book_info: &BookInfo,
    chapters: &[Chapter],
    config: &RenderConfig,
) -> Result<Vec<String>> {
    let html = template::render(
        &config.template_dir,
        config.style,
        RenderMode::PreRender,
        book_info,
        chapters,
    )?;

    let html_path = sibling(&config.output, "_prerender.html");
    let pdf_path = sibling(&config.output, "_prerender.pdf");
    fs::write(&html_path, &html)?;

    pdf::html_to_pdf(&html_path, &pdf_path, &config.base_dir, &config.quality)?;
    pdf::page_texts(&pdf_path)
}

/// Path of an output sibling: `book.pdf` plus `_debug.html` gives `book_debug.html`
fn sibling(output: &Path, suffix: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("book");
    output.with_file_name(format!("{stem}{suffix}"))
}
