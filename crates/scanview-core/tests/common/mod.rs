#![allow(dead_code)]

use std::path::PathBuf;

use image::{Rgb, RgbImage};
use scanview_core::catalog::{Defect, TileRecord};
use scanview_core::config::{SourceConfig, ViewerConfig};

/// Deterministic test pattern: red follows x, green follows y.
pub fn pattern_pixel(x: u32, y: u32) -> [u8; 3] {
    [(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]
}

pub fn pattern_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb(pattern_pixel(x, y)))
}

/// Build a binary P6 file in memory.
pub fn build_ppm(width: u32, height: u32) -> Vec<u8> {
    let mut buf = format!("P6\n# test pattern\n{width} {height}\n255\n").into_bytes();
    for y in 0..height {
        for x in 0..width {
            buf.extend_from_slice(&pattern_pixel(x, y));
        }
    }
    buf
}

/// Build a binary P5 file whose grey value follows x.
pub fn build_pgm(width: u32, height: u32) -> Vec<u8> {
    let mut buf = format!("P5\n{width} {height}\n255\n").into_bytes();
    for _ in 0..height {
        for x in 0..width {
            buf.push((x % 256) as u8);
        }
    }
    buf
}

/// Write `data` as `name` inside a fresh temp dir.
///
/// The file lives as long as the returned `TempDir` is not dropped.
pub fn write_temp(name: &str, data: &[u8]) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, data).expect("write test file");
    (dir, path)
}

pub fn write_ppm(width: u32, height: u32) -> (tempfile::TempDir, PathBuf) {
    write_temp("tile.ppm", &build_ppm(width, height))
}

pub fn write_png(width: u32, height: u32) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("tile.png");
    pattern_image(width, height).save(&path).expect("write PNG");
    (dir, path)
}

/// Thresholds scaled down so small synthetic files exercise the huge path.
pub fn small_huge_config() -> SourceConfig {
    SourceConfig {
        huge_size: 64,
        band_height: 16,
        pyramid_cutoff: 16,
        ..SourceConfig::default()
    }
}

pub fn viewer_config(canvas_width: u32, canvas_height: u32) -> ViewerConfig {
    let mut config = ViewerConfig::default();
    config.viewport.canvas_width = canvas_width;
    config.viewport.canvas_height = canvas_height;
    config
}

pub fn tile(image_id: u64, width_um: f64, height_um: f64, width_px: f64, height_px: f64) -> TileRecord {
    TileRecord {
        image_id,
        file_name: format!("tile_{image_id}.png"),
        row: 0,
        column: 0,
        width_um,
        height_um,
        width_px,
        height_px,
    }
}

pub fn defect(id: u64, image_id: u64, x: f64, y: f64, area: f64) -> Defect {
    Defect {
        id,
        image_id,
        x,
        y,
        width: 2.0,
        height: 4.0,
        area,
        orientation: 0.0,
        class_id: None,
        analysis_id: 1,
        device_id: 0,
        intensity: 0.0,
        intensity_deviation: 0.0,
        eccentricity: 0.0,
        x_in_device: 0.0,
        y_in_device: 0.0,
        score: 0.0,
        contour: String::new(),
    }
}
