//! Memoir Press CLI tool
//!
//! A command-line tool for rendering biography documents into paginated
//! PDF books.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use std::path::PathBuf;
use std::process;

use memoir_press::book;
use memoir_press::paginate::StaticFormula;
use memoir_press::pdf::PdfQuality;
use memoir_press::pipeline::{self, RenderConfig};
use memoir_press::template::StyleVariant;

/// Memoir Press - Render biography documents into PDF books
#[derive(Parser)]
#[command(name = "memoir-press")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Render a biography with the decorated book layout
    memoir-press build biography.json -o output/memoir.pdf

    # Render every document in a folder with the A4 reference layout
    memoir-press build \"books/*.json\" -o output --style reference

    # Lower the image resolution and open the result
    memoir-press build biography.json -o memoir.pdf --dpi 150 --open

    # Inspect a document without rendering
    memoir-press info biography.json")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one or more biography documents to PDF
    Build(BuildArgs),

    /// Show information about a biography document
    Info {
        /// Document to inspect
        input: PathBuf,
    },
}

#[derive(Args)]
struct BuildArgs {
    /// Input JSON documents. Supports glob patterns like "books/*.json"
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output PDF file (single input) or directory (multiple inputs)
    #[arg(short, long)]
    output: PathBuf,

    /// Directory holding the style variant templates
    #[arg(long, default_value = "templates")]
    template_dir: PathBuf,

    /// Style variant: book, reference, or classic
    #[arg(long, default_value = "book")]
    style: StyleVariant,

    /// Directory generated QR images are written to
    #[arg(long, default_value = "qr_codes")]
    assets_dir: PathBuf,

    /// Fallback QR image for chapters without a link
    #[arg(long, default_value = "qrcode.jpg")]
    default_asset: PathBuf,

    /// Base directory for relative asset references in the markup
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Image resolution in DPI
    #[arg(long, default_value_t = 300)]
    dpi: u32,

    /// JPEG re-encoding quality (0-95)
    #[arg(long, default_value_t = 95)]
    jpeg_quality: u8,

    /// Skip image recompression in the renderer
    #[arg(long)]
    no_optimize_images: bool,

    /// Assumed front-matter pages for the fallback page formula
    #[arg(long, default_value_t = 3)]
    front_matter_pages: usize,

    /// Assumed pages per chapter for the fallback page formula
    #[arg(long, default_value_t = 2)]
    pages_per_chapter: usize,

    /// Open the output file after creation
    #[arg(long)]
    open: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build(args) => cmd_build(args),
        Commands::Info { input } => cmd_info(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Expand glob patterns in input paths
fn expand_globs(patterns: Vec<String>) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        // Check if pattern contains glob characters
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let mut matched = false;
            for entry in glob(&pattern)? {
                match entry {
                    Ok(path) => {
                        paths.push(path);
                        matched = true;
                    }
                    Err(e) => eprintln!("Warning: glob error for {}: {}", pattern, e),
                }
            }
            if !matched {
                bail!("no documents matched pattern: {}", pattern);
            }
        } else {
            // No glob characters, treat as literal path
            paths.push(PathBuf::from(pattern));
        }
    }

    // Sort paths for consistent ordering
    paths.sort();

    Ok(paths)
}

/// Open a file with the system default application
fn open_file(path: &PathBuf) -> anyhow::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Render each input document through the full pipeline
fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let inputs = expand_globs(args.inputs)?;

    // Validate inputs exist
    for path in &inputs {
        if !path.exists() {
            bail!("input file not found: {}", path.display());
        }
    }

    let output_is_dir = args.output.is_dir() || args.output.extension().is_none();
    if inputs.len() > 1 && !output_is_dir {
        bail!(
            "multiple inputs need an output directory, got: {}",
            args.output.display()
        );
    }

    let quality = PdfQuality {
        dpi: args.dpi,
        jpeg_quality: args.jpeg_quality,
        optimize_images: !args.no_optimize_images,
    };
    let formula = StaticFormula {
        front_matter_pages: args.front_matter_pages,
        pages_per_chapter: args.pages_per_chapter,
    };

    for input in inputs {
        let output = if output_is_dir {
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("memoir");
            args.output.join(format!("{stem}.pdf"))
        } else {
            args.output.clone()
        };

        eprintln!("Rendering {} ({} layout)...", input.display(), args.style);

        let config = RenderConfig {
            input: input.clone(),
            template_dir: args.template_dir.clone(),
            output,
            style: args.style,
            assets_dir: args.assets_dir.clone(),
            default_asset: args.default_asset.clone(),
            base_dir: args.base_dir.clone(),
            quality,
            formula,
        };

        let summary = pipeline::run(&config)
            .with_context(|| format!("failed to render {}", input.display()))?;

        eprintln!(
            "Output: {} ({} pages, contents via {})",
            summary.output.display(),
            summary.page_count,
            summary.strategy
        );

        if args.open {
            open_file(&summary.output)?;
        }
    }

    Ok(())
}

/// Show information about a biography document
fn cmd_info(input: PathBuf) -> anyhow::Result<()> {
    let biography =
        book::load(&input).with_context(|| format!("failed to load {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Title: {}", biography.book_info.title);
    println!("Author: {}", biography.book_info.author);
    println!("Chapters: {}", biography.chapters.len());

    for chapter in &biography.chapters {
        let link = if chapter
            .qr_link
            .as_deref()
            .is_some_and(|l| !l.trim().is_empty())
        {
            ", link"
        } else {
            ""
        };
        println!(
            "  {:>3}. {} ({} paragraphs, {} images{})",
            chapter.id,
            chapter.title,
            chapter.content.len(),
            chapter.images.len(),
            link
        );
    }

    Ok(())
}
