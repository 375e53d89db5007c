use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BAND_HEIGHT, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_ELLIPSE_SAMPLES,
    DEFAULT_HUGE_SIZE, DEFAULT_KEY_SCROLL_FRACTION, DEFAULT_LABEL_FONT_SIZE,
    DEFAULT_MIN_RENDERED_SIDE, DEFAULT_MOSAIC_MARK_SIZE, DEFAULT_PYRAMID_CUTOFF,
    DEFAULT_PYRAMID_REDUCTION, DEFAULT_ZOOM_STEP,
};

/// Resampling filter used for pyramid levels and viewport crops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl std::fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "Nearest"),
            Self::Triangle => write!(f, "Triangle"),
            Self::CatmullRom => write!(f, "Catmull-Rom"),
            Self::Lanczos3 => write!(f, "Lanczos3"),
        }
    }
}

/// Settings for opening sources and building pyramids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Sources with more than `huge_size²` pixels are decoded in bands.
    #[serde(default = "default_huge_size")]
    pub huge_size: u32,
    /// Rows per decoded band for huge sources.
    #[serde(default = "default_band_height")]
    pub band_height: u32,
    /// Stop adding pyramid levels once a side is at or below this size.
    #[serde(default = "default_pyramid_cutoff")]
    pub pyramid_cutoff: u32,
    /// Size ratio between consecutive pyramid levels.
    #[serde(default = "default_pyramid_reduction")]
    pub pyramid_reduction: f64,
    #[serde(default)]
    pub filter: ResampleFilter,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            huge_size: DEFAULT_HUGE_SIZE,
            band_height: DEFAULT_BAND_HEIGHT,
            pyramid_cutoff: DEFAULT_PYRAMID_CUTOFF,
            pyramid_reduction: DEFAULT_PYRAMID_REDUCTION,
            filter: ResampleFilter::default(),
        }
    }
}

/// Settings for the interactive tile viewport.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Zoom multiplier per wheel tick.
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,
    /// Zoom-out stops before the shorter image side would render below this.
    #[serde(default = "default_min_rendered_side")]
    pub min_rendered_side: f64,
    /// Fraction of the window moved by one keyboard scroll.
    #[serde(default = "default_key_scroll_fraction")]
    pub key_scroll_fraction: f64,
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom_step: DEFAULT_ZOOM_STEP,
            min_rendered_side: DEFAULT_MIN_RENDERED_SIDE,
            key_scroll_fraction: DEFAULT_KEY_SCROLL_FRACTION,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

/// Settings for defect marks and labels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default = "default_label_font_size")]
    pub label_font_size: f64,
    /// Vertices used to approximate an oriented ellipse.
    #[serde(default = "default_ellipse_samples")]
    pub ellipse_samples: usize,
    /// Radius of defect dots on the mosaic.
    #[serde(default = "default_mosaic_mark_size")]
    pub mosaic_mark_size: f64,
    /// Show only the image, without defect marks or labels.
    #[serde(default)]
    pub image_view_only: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            label_font_size: DEFAULT_LABEL_FONT_SIZE,
            ellipse_samples: DEFAULT_ELLIPSE_SAMPLES,
            mosaic_mark_size: DEFAULT_MOSAIC_MARK_SIZE,
            image_view_only: false,
        }
    }
}

/// Complete viewer configuration, loadable from TOML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

fn default_huge_size() -> u32 {
    DEFAULT_HUGE_SIZE
}
fn default_band_height() -> u32 {
    DEFAULT_BAND_HEIGHT
}
fn default_pyramid_cutoff() -> u32 {
    DEFAULT_PYRAMID_CUTOFF
}
fn default_pyramid_reduction() -> f64 {
    DEFAULT_PYRAMID_REDUCTION
}
fn default_zoom_step() -> f64 {
    DEFAULT_ZOOM_STEP
}
fn default_min_rendered_side() -> f64 {
    DEFAULT_MIN_RENDERED_SIDE
}
fn default_key_scroll_fraction() -> f64 {
    DEFAULT_KEY_SCROLL_FRACTION
}
fn default_canvas_width() -> u32 {
    DEFAULT_CANVAS_WIDTH
}
fn default_canvas_height() -> u32 {
    DEFAULT_CANVAS_HEIGHT
}
fn default_label_font_size() -> f64 {
    DEFAULT_LABEL_FONT_SIZE
}
fn default_ellipse_samples() -> usize {
    DEFAULT_ELLIPSE_SAMPLES
}
fn default_mosaic_mark_size() -> f64 {
    DEFAULT_MOSAIC_MARK_SIZE
}
