use std::path::Path;

use image::{ImageFormat, RgbImage};

use crate::error::Result;

/// Save an RGB bitmap as 8-bit PNG.
pub fn save_png(img: &RgbImage, path: &Path) -> Result<()> {
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save an RGB bitmap as 8-bit TIFF.
pub fn save_tiff(img: &RgbImage, path: &Path) -> Result<()> {
    img.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save an RGB bitmap, choosing format from file extension (PNG by default).
pub fn save_image(img: &RgbImage, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("tiff" | "tif") => save_tiff(img, path),
        _ => save_png(img, path),
    }
}

/// Load any supported image file as RGB8.
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    Ok(image::open(path)?.to_rgb8())
}
