//! The whole-scan mosaic: a downscaled overview image with every defect
//! drawn as a dot and each tile clickable.

use std::path::Path;

use image::RgbImage;
use tracing::{info, warn};

use crate::catalog::{Defect, ScanCatalog, TileRecord};
use crate::config::{OverlayConfig, SourceConfig};
use crate::error::Result;
use crate::geometry::{CanvasPoint, CanvasRect};
use crate::io::raster::RasterSource;
use crate::overlay::{
    BinStatistics, BinningScheme, OverlayGroup, OverlayItem, OverlayScene, OverlayShape,
};

/// The tile grid laid over the mosaic image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MosaicLayout {
    pub rows: u32,
    pub cols: u32,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl MosaicLayout {
    /// Grid sized from the largest row and column indices in `tiles`, spread
    /// over a `width x height` display.
    pub fn new(tiles: &[TileRecord], width: u32, height: u32) -> Self {
        let rows = tiles.iter().map(|t| t.row).max().map_or(1, |r| r + 1);
        let cols = tiles.iter().map(|t| t.column).max().map_or(1, |c| c + 1);
        Self {
            rows,
            cols,
            cell_width: width as f64 / cols as f64,
            cell_height: height as f64 / rows as f64,
        }
    }

    pub fn cell_rect(&self, row: u32, column: u32) -> CanvasRect {
        CanvasRect::from_origin_size(
            column as f64 * self.cell_width,
            row as f64 * self.cell_height,
            self.cell_width,
            self.cell_height,
        )
    }

    /// Mosaic position of a defect on `tile`.
    pub fn defect_position(&self, defect: &Defect, tile: &TileRecord) -> CanvasPoint {
        CanvasPoint::new(
            self.cell_width * (defect.x / tile.width_um + tile.column as f64),
            self.cell_height * (defect.y / tile.height_um + tile.row as f64),
        )
    }

    /// First tile whose cell contains `p`, edges included.
    pub fn hit_test<'a>(&self, tiles: &'a [TileRecord], p: CanvasPoint) -> Option<&'a TileRecord> {
        tiles
            .iter()
            .find(|t| self.cell_rect(t.row, t.column).contains(p))
    }
}

pub struct MosaicView {
    image: RgbImage,
    layout: MosaicLayout,
    scene: OverlayScene,
    statistics: BinStatistics,
}

impl MosaicView {
    /// Open the mosaic image shrunk by the integer `image_scale` and place
    /// the catalog's defects on it. Fails on any tile with non-positive
    /// micron or pixel sizes.
    pub fn open(
        path: &Path,
        image_scale: u32,
        catalog: &ScanCatalog,
        source_config: &SourceConfig,
        overlay_config: &OverlayConfig,
        progress: impl FnMut(usize, usize),
    ) -> Result<Self> {
        for tile in &catalog.tiles {
            tile.validate()?;
        }

        let mut source = RasterSource::open(path, source_config)?;
        let scale = image_scale.max(1) as f64;
        let (w, h) = source.native_size();
        let target_w = (w as f64 / scale).round().max(1.0) as u32;
        let target_h = (h as f64 / scale).round().max(1.0) as u32;
        let image = source.downsample(target_w, target_h, progress)?;

        let layout = MosaicLayout::new(&catalog.tiles, target_w, target_h);
        let binning = &catalog.binning;
        let mut scene = OverlayScene::new(binning.scheme);

        if !overlay_config.image_view_only {
            let radius = overlay_config.mosaic_mark_size;
            for defect in &catalog.defects {
                let Ok(tile) = catalog.tile(defect.image_id) else {
                    warn!(
                        defect = defect.id,
                        image_id = defect.image_id,
                        "Defect on unknown tile skipped"
                    );
                    continue;
                };
                let center = layout.defect_position(defect, tile);
                scene.push(
                    OverlayGroup::SizeBinningMarks,
                    OverlayShape::Dot {
                        center,
                        radius,
                        color: binning.size_color(defect.area),
                    },
                );
                scene.push(
                    OverlayGroup::ClassBinningMarks,
                    OverlayShape::Dot {
                        center,
                        radius,
                        color: binning.class_color(defect.class_id),
                    },
                );
            }
        }

        let statistics = BinStatistics::collect(binning, &catalog.defects);
        info!(
            width = target_w,
            height = target_h,
            rows = layout.rows,
            cols = layout.cols,
            defects = catalog.defects.len(),
            "Opened mosaic"
        );

        Ok(Self {
            image,
            layout,
            scene,
            statistics,
        })
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn layout(&self) -> &MosaicLayout {
        &self.layout
    }

    pub fn statistics(&self) -> &BinStatistics {
        &self.statistics
    }

    pub fn scene(&self) -> &OverlayScene {
        &self.scene
    }

    pub fn set_binning_scheme(&mut self, scheme: BinningScheme) {
        self.scene.visibility_mut().set_scheme(scheme);
    }

    pub fn overlay_items(&self) -> Vec<OverlayItem> {
        self.scene.visible_items().cloned().collect()
    }

    /// Tile under a click on the mosaic.
    pub fn tile_at<'a>(&self, catalog: &'a ScanCatalog, p: CanvasPoint) -> Option<&'a TileRecord> {
        self.layout.hit_test(&catalog.tiles, p)
    }
}
