//! Integration tests for the memoir-press library

use memoir_press::assets::{attach_qr_codes, AssetOptions};
use memoir_press::book;
use memoir_press::paginate::{self, Resolution, StaticFormula, Strategy};
use memoir_press::pdf;
use memoir_press::template::{render, RenderMode, StyleVariant};
use memoir_press::Error;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test helper to get the path to the shipped template directory
fn template_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("templates");
    path
}

/// A three-chapter biography exercising images, links, and the fallbacks
fn sample_document() -> &'static str {
    r#"{
        "book_info": {
            "title": "A Quiet Life",
            "author": "Hua Gu",
            "about": ["Born in 1948.", "Taught for forty years."]
        },
        "chapters": [
            {
                "id": 1,
                "title": "Childhood",
                "content": ["First paragraph.", "Second paragraph."],
                "images": [
                    { "url": "images/river.jpg", "alt": "The river", "caption": "The river at dawn" }
                ],
                "qr_link": "https://example.com/audio/1"
            },
            {
                "id": 2,
                "title": "School Years",
                "content": ["Only paragraph."]
            },
            {
                "id": 3,
                "title": "Teaching",
                "content": ["One.", "Two.", "Three."],
                "qr_link": ""
            }
        ]
    }"#
}

fn write_sample(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("biography.json");
    std::fs::write(&path, sample_document()).expect("write sample document");
    path
}

fn load_sample(dir: &TempDir) -> book::Biography {
    book::load(&write_sample(dir)).expect("sample document should load")
}

#[test]
fn test_loader_preserves_count_and_order() {
    let dir = TempDir::new().expect("temp dir");
    let biography = load_sample(&dir);

    assert_eq!(biography.chapters.len(), 3);
    let ids: Vec<u32> = biography.chapters.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(biography.book_info.title, "A Quiet Life");
}

#[test]
fn test_loader_rejects_malformed_document() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").expect("write file");

    let result = book::load(&path);
    assert!(matches!(result.unwrap_err(), Error::Json(_)));
}

#[test]
fn test_loader_rejects_missing_title() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("untitled.json");
    std::fs::write(
        &path,
        r#"{ "book_info": { "author": "A" }, "chapters": [{ "id": 1, "title": "x" }] }"#,
    )
    .expect("write file");

    let result = book::load(&path);
    assert!(matches!(result.unwrap_err(), Error::Json(_)));
}

#[test]
fn test_static_formula_literal_values() {
    let formula = StaticFormula {
        front_matter_pages: 3,
        pages_per_chapter: 2,
    };
    assert_eq!(formula.page_for_index(1), 4);
    assert_eq!(formula.page_for_index(2), 6);
    assert_eq!(formula.page_for_index(3), 8);
}

#[test]
fn test_marker_extraction_resolves_known_pages() {
    let dir = TempDir::new().expect("temp dir");
    let biography = load_sample(&dir);

    // Synthetic pre-render output: chapter headings on pages 4, 6, and 9
    let mut pages = vec![String::new(); 9];
    pages[3] = "Childhood [PAGE:1] body text".to_string();
    pages[5] = "School Years [PAGE:2]".to_string();
    pages[8] = "Teaching [PAGE:3]".to_string();

    let resolution = paginate::resolve(
        &biography.chapters,
        Ok(pages),
        &StaticFormula::default(),
    );

    assert_eq!(resolution.strategy, Strategy::MarkerExtraction);
    assert_eq!(resolution.pages[&1], 4);
    assert_eq!(resolution.pages[&2], 6);
    assert_eq!(resolution.pages[&3], 9);
}

#[test]
fn test_marker_first_page_wins_when_heading_repeats() {
    let dir = TempDir::new().expect("temp dir");
    let biography = load_sample(&dir);

    let pages = vec![
        String::new(),
        "Childhood [PAGE:1]".to_string(),
        "Childhood [PAGE:1] continued".to_string(),
        "[PAGE:2]".to_string(),
        "[PAGE:3]".to_string(),
    ];

    let resolution = paginate::resolve(
        &biography.chapters,
        Ok(pages),
        &StaticFormula::default(),
    );
    assert_eq!(resolution.pages[&1], 2);
}

#[test]
fn test_resolver_falls_back_when_prerender_fails() {
    let dir = TempDir::new().expect("temp dir");
    let biography = load_sample(&dir);

    let failure = Err(Error::Render("weasyprint exited with signal 9".to_string()));
    let resolution = paginate::resolve(&biography.chapters, failure, &StaticFormula::default());

    assert_eq!(resolution.strategy, Strategy::StaticFormula);
    // The mapping must still cover every chapter id
    for (position, chapter) in biography.chapters.iter().enumerate() {
        let expected = StaticFormula::default().page_for_index(position + 1);
        assert_eq!(resolution.pages[&chapter.id], expected);
    }
}

#[test]
fn test_asset_stage_never_leaves_a_chapter_without_an_asset() {
    let dir = TempDir::new().expect("temp dir");
    let biography = load_sample(&dir);

    let options = AssetOptions {
        dir: dir.path().join("qr"),
        default_asset: PathBuf::from("qrcode.jpg"),
    };
    let chapters = attach_qr_codes(biography.chapters, &options);

    // Linked chapter gets its own file; no-link and blank-link chapters get
    // the shared default
    assert!(chapters[0]
        .qr_code
        .as_deref()
        .expect("asset path")
        .ends_with("chapter_1_qr.png"));
    assert_eq!(chapters[1].qr_code.as_deref(), Some("qrcode.jpg"));
    assert_eq!(chapters[2].qr_code.as_deref(), Some("qrcode.jpg"));
}

#[test]
fn test_render_is_idempotent() {
    let dir = TempDir::new().expect("temp dir");
    let biography = load_sample(&dir);

    let resolution = Resolution {
        pages: [(1, 4), (2, 6), (3, 8)].into_iter().collect(),
        strategy: Strategy::MarkerExtraction,
    };
    let chapters = paginate::apply(biography.chapters, &resolution);

    for variant in [
        StyleVariant::Book,
        StyleVariant::Reference,
        StyleVariant::Classic,
    ] {
        let first = render(
            &template_dir(),
            variant,
            RenderMode::Final,
            &biography.book_info,
            &chapters,
        )
        .expect("render should succeed");
        let second = render(
            &template_dir(),
            variant,
            RenderMode::Final,
            &biography.book_info,
            &chapters,
        )
        .expect("render should succeed");

        assert_eq!(first, second, "{variant} render is not idempotent");
    }
}

#[test]
fn test_prerender_markup_has_markers_and_no_contents() {
    let dir = TempDir::new().expect("temp dir");
    let biography = load_sample(&dir);

    let html = render(
        &template_dir(),
        StyleVariant::Book,
        RenderMode::PreRender,
        &biography.book_info,
        &biography.chapters,
    )
    .expect("pre-render should succeed");

    for chapter in &biography.chapters {
        assert!(html.contains(&paginate::marker(chapter.id)));
    }
    assert!(!html.contains("class=\"contents\""));
}

#[test]
fn test_final_markup_lists_resolved_pages() {
    let dir = TempDir::new().expect("temp dir");
    let biography = load_sample(&dir);

    let resolution = Resolution {
        pages: [(1, 4), (2, 6), (3, 11)].into_iter().collect(),
        strategy: Strategy::MarkerExtraction,
    };
    let chapters = paginate::apply(biography.chapters, &resolution);

    let html = render(
        &template_dir(),
        StyleVariant::Book,
        RenderMode::Final,
        &biography.book_info,
        &chapters,
    )
    .expect("final render should succeed");

    assert!(html.contains("class=\"contents\""));
    assert!(html.contains("<span class=\"toc-page\">11</span>"));
    // Markers belong to the pre-render pass only
    assert!(!html.contains("[PAGE:"));
}

#[test]
fn test_template_referencing_undefined_field_fails() {
    let dir = TempDir::new().expect("temp dir");
    let biography = load_sample(&dir);

    std::fs::write(
        dir.path().join("book.html"),
        "<html><body>{{ book_info.publisher }}</body></html>",
    )
    .expect("write template");

    let result = render(
        dir.path(),
        StyleVariant::Book,
        RenderMode::Final,
        &biography.book_info,
        &biography.chapters,
    );
    assert!(matches!(result.unwrap_err(), Error::Template(_)));
}

#[test]
fn test_emitter_failure_is_a_render_error() {
    let dir = TempDir::new().expect("temp dir");
    let missing_html = dir.path().join("missing.html");
    let output = dir.path().join("out.pdf");

    // Fails whether or not the renderer is installed: either the spawn
    // fails or weasyprint exits non-zero on the missing input
    let result = pdf::html_to_pdf(
        &missing_html,
        &output,
        dir.path(),
        &pdf::PdfQuality::default(),
    );
    assert!(matches!(result.unwrap_err(), Error::Render(_)));
}

#[test]
fn test_count_pages_nonexistent_file() {
    let result = pdf::count_pages(Path::new("nonexistent.pdf"));
    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
}
