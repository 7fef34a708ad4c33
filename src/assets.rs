//! QR code asset generation
//!
//! Chapters with an external link get a scannable QR image at a
//! deterministic path keyed by chapter id; chapters without a link, and any
//! chapter whose generation fails, get the shared default asset instead.
//! This stage never fails the pipeline.

use std::path::{Path, PathBuf};

use image::Luma;
use log::warn;
use qrcode::QrCode;

use crate::book::Chapter;
use crate::error::{Error, Result};

/// Options for the asset generation stage
#[derive(Debug, Clone)]
pub struct AssetOptions {
    /// Directory QR images are written to (created if absent)
    pub dir: PathBuf,
    /// Shared fallback asset assigned when no link is present or
    /// generation fails
    pub default_asset: PathBuf,
}

/// Attach a QR asset path to every chapter
///
/// Consumes the chapter list and returns it with `qr_code` filled in on
/// every chapter. Generation failures are logged and degrade to the default
/// asset; they are never propagated.
pub fn attach_qr_codes(chapters: Vec<Chapter>, options: &AssetOptions) -> Vec<Chapter> {
    let default_asset = options.default_asset.display().to_string();

    if let Err(e) = std::fs::create_dir_all(&options.dir) {
        warn!(
            "cannot create asset directory {}: {e}; using the default asset for all chapters",
            options.dir.display()
        );
        return chapters
            .into_iter()
            .map(|mut chapter| {
                chapter.qr_code = Some(default_asset.clone());
                chapter
            })
            .collect();
    }

    chapters
        .into_iter()
        .map(|mut chapter| {
            chapter.qr_code = Some(match chapter.qr_link.as_deref() {
                Some(link) if !link.trim().is_empty() => {
                    let target = options.dir.join(format!("chapter_{}_qr.png", chapter.id));
                    match write_qr_image(link, &target) {
                        Ok(path) => path,
                        Err(e) => {
                            warn!("QR generation failed for chapter {}: {e}", chapter.id);
                            default_asset.clone()
                        }
                    }
                }
                _ => default_asset.clone(),
            });
            chapter
        })
        .collect()
}

/// Encode a link as a QR image and write it as a PNG
fn write_qr_image(link: &str, target: &Path) -> Result<String> {
    let code = QrCode::new(link.as_bytes()).map_err(|e| Error::Asset(e.to_string()))?;
    let image = code.render::<Luma<u8>>().build();
    image
        .save(target)
        .map_err(|e| Error::Asset(e.to_string()))?;
    Ok(target.display().to_string())
}
