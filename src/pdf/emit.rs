//! HTML-to-PDF emission via the external WeasyPrint renderer
//!
//! Layout and PDF creation are delegated entirely to `weasyprint`, invoked
//! as a command-line tool. The emitter applies the same quality settings to
//! both the pre-render pass and the final document so the two layouts
//! paginate identically.

use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Image quality and resolution settings applied to every render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfQuality {
    /// Image resolution in DPI
    pub dpi: u32,
    /// JPEG re-encoding quality (0-95)
    pub jpeg_quality: u8,
    /// Whether the renderer may recompress embedded images
    pub optimize_images: bool,
}

impl Default for PdfQuality {
    fn default() -> Self {
        Self {
            dpi: 300,
            jpeg_quality: 95,
            optimize_images: true,
        }
    }
}

/// Render an HTML file to a PDF file
///
/// `base_dir` resolves relative asset references (images, fonts) in the
/// markup. Any failure (the renderer missing from the system, a non-zero
/// exit, no output file appearing) is reported as a render error carrying
/// the renderer's diagnostics.
pub fn html_to_pdf(
    html_path: &Path,
    output_path: &Path,
    base_dir: &Path,
    quality: &PdfQuality,
) -> Result<()> {
    let mut command = Command::new("weasyprint");
    command
        .arg("--base-url")
        .arg(base_dir)
        .arg("--presentational-hints")
        .arg("--dpi")
        .arg(quality.dpi.to_string())
        .arg("--jpeg-quality")
        .arg(quality.jpeg_quality.to_string());
    if quality.optimize_images {
        command.arg("--optimize-images");
    }
    command.arg(html_path).arg(output_path);

    let output = command.output().map_err(|e| {
        Error::Render(format!(
            "failed to invoke weasyprint (is it installed?): {e}"
        ))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Render(format!(
            "weasyprint exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    if !output_path.exists() {
        return Err(Error::Render(format!(
            "weasyprint reported success but produced no file at {}",
            output_path.display()
        )));
    }

    Ok(())
}
