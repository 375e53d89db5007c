//! Reduced-resolution copies of a source, built once when a tile is opened.
//!
//! Level 0 is the full image, or for huge sources an aspect-preserving proxy
//! whose longer side equals `huge_size`. Each following level is the previous
//! one divided by the reduction factor, until either side reaches the cutoff.

use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::{debug, info, warn};

use crate::config::SourceConfig;
use crate::consts::SNAP_EPSILON;
use crate::error::{Result, ViewerError};
use crate::io::raster::{proxy_size, RasterSource};

/// Which bitmap a redraw should crop from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelSelection {
    /// Crop from this pyramid level.
    Level(usize),
    /// Zoomed past the proxy of a huge source: decode native rows directly.
    HugeBypass,
}

pub struct ImagePyramid {
    levels: Vec<RgbImage>,
    reduction: f64,
    /// `max(W, H) / huge_size` for a huge proxy, otherwise 1.
    ratio: f64,
    huge: bool,
}

impl ImagePyramid {
    /// Build all levels for `source`. `progress` receives `(done, total)`
    /// while level 0 is decoded.
    pub fn build(
        source: &mut RasterSource,
        config: &SourceConfig,
        progress: impl FnMut(usize, usize),
    ) -> Result<Self> {
        let (width, height) = source.native_size();
        let huge = source.is_huge();
        let filter = config.filter.filter_type();

        let (base, ratio) = if huge {
            let (pw, ph) = proxy_size(width, height, config.huge_size);
            let ratio = width.max(height) as f64 / config.huge_size as f64;
            (source.downsample(pw, ph, progress)?, ratio)
        } else {
            (source.downsample(width, height, progress)?, 1.0)
        };

        let (bw, bh) = base.dimensions();
        if bw == 0 || bh == 0 {
            return Err(ViewerError::ImageTooSmall {
                width: bw,
                height: bh,
            });
        }

        let reduction = config.pyramid_reduction;
        let levels = if reduction > 1.0 {
            reduce_levels(base, reduction, config.pyramid_cutoff, filter)
        } else {
            warn!(reduction, "Pyramid reduction must exceed 1; keeping level 0 only");
            vec![base]
        };

        info!(
            levels = levels.len(),
            base_width = bw,
            base_height = bh,
            ratio,
            huge,
            "Built image pyramid"
        );

        Ok(Self {
            levels,
            reduction,
            ratio,
            huge,
        })
    }

    pub fn levels(&self) -> &[RgbImage] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level `index`, clamped to the coarsest level.
    pub fn level(&self, index: usize) -> &RgbImage {
        &self.levels[index.min(self.levels.len() - 1)]
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn reduction(&self) -> f64 {
        self.reduction
    }

    /// Whether level 0 is a reduced proxy of a huge source.
    pub fn is_huge_proxy(&self) -> bool {
        self.huge
    }

    /// Pick the level that matches a cumulative zoom of `imscale`.
    ///
    /// `level = floor(-log_k(imscale * ratio))`, clamped to the available
    /// levels. A negative value on a huge source selects the native bypass.
    pub fn select_level(&self, imscale: f64) -> LevelSelection {
        let raw = raw_level(imscale * self.ratio, self.reduction);
        let selection = if raw < 0 && self.huge {
            LevelSelection::HugeBypass
        } else {
            LevelSelection::Level((raw.max(0) as usize).min(self.levels.len() - 1))
        };
        debug!(imscale, raw, ?selection, "Selected pyramid level");
        selection
    }
}

fn raw_level(scale: f64, reduction: f64) -> i64 {
    if reduction <= 1.0 {
        return 0;
    }
    // Snap so that scale == reduction^-n lands on exactly n.
    (-scale.ln() / reduction.ln() + SNAP_EPSILON).floor() as i64
}

fn reduce_levels(base: RgbImage, reduction: f64, cutoff: u32, filter: FilterType) -> Vec<RgbImage> {
    let (mut w, mut h) = {
        let (w, h) = base.dimensions();
        (w as f64, h as f64)
    };
    let mut levels = vec![base];

    while w > cutoff as f64 && h > cutoff as f64 {
        w /= reduction;
        h /= reduction;
        let (tw, th) = ((w as u32).max(1), (h as u32).max(1));
        let prev = &levels[levels.len() - 1];
        let next = imageops::resize(prev, tw, th, filter);
        debug!(level = levels.len(), width = tw, height = th, "Reduced pyramid level");
        levels.push(next);
    }
    levels
}
