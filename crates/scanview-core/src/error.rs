use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot open image {path}: {reason}")]
    ImageOpen { path: PathBuf, reason: String },

    #[error("Image has no pixels: {width}x{height}")]
    ImageTooSmall { width: u32, height: u32 },

    #[error("Region {width}x{height} at ({x},{y}) is empty inside a {image_width}x{image_height} image")]
    InvalidRegion {
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        image_width: u32,
        image_height: u32,
    },

    #[error("Invalid tile metadata for image {image_id}: {reason}")]
    InvalidTileMetadata { image_id: u64, reason: String },

    #[error("No tile with image id {0}")]
    TileNotFound(u64),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
