use std::f64::consts::PI;

use crate::catalog::{Defect, LabelField, TileRecord};
use crate::config::OverlayConfig;
use crate::consts::{DEFECT_MARK_LINE_WIDTH, FONT_EPSILON, LABEL_OFFSET_DIVISOR};
use crate::geometry::{CanvasPoint, CanvasRect, MicronPoint};

use super::binning::BinningConfig;
use super::color::Color;
use super::shapes::{OverlayGroup, OverlayScene, OverlayShape};

/// Tracks the label font size across zoom ticks.
///
/// The unrounded size is carried between ticks so that a run of zoom-outs
/// that pins the displayed size at 1 still unwinds correctly on the way
/// back in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontScaler {
    accumulator: f64,
    displayed: u32,
}

impl FontScaler {
    pub fn new(initial: f64) -> Self {
        Self {
            accumulator: initial,
            displayed: (initial.round() as u32).max(1),
        }
    }

    pub fn displayed(&self) -> u32 {
        self.displayed
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Apply one zoom tick of factor `s` and return the new displayed size.
    pub fn apply(&mut self, s: f64) -> u32 {
        let indicator = self.accumulator * s;
        let size = if s < 1.0 && indicator >= 1.0 {
            (indicator + FONT_EPSILON).floor()
        } else {
            (indicator - FONT_EPSILON).ceil()
        };
        self.displayed = (size as u32).max(1);
        self.accumulator = indicator;
        self.displayed
    }
}

/// Map a tile-relative micron position into canvas coordinates using the
/// current container rectangle.
pub fn project(point: MicronPoint, tile: &TileRecord, container: &CanvasRect) -> CanvasPoint {
    CanvasPoint::new(
        container.x0 + point.x * container.width() / tile.width_um,
        container.y0 + point.y * container.height() / tile.height_um,
    )
}

/// Polygon approximating an ellipse with semi-axes `a` (x) and `b` (y)
/// centred on `center`, rotated `rotation_deg` degrees counter-clockwise.
pub fn poly_oval(
    center: CanvasPoint,
    a: f64,
    b: f64,
    rotation_deg: f64,
    steps: usize,
) -> Vec<CanvasPoint> {
    let rotation = rotation_deg * PI / 180.0;
    let (sin_r, cos_r) = rotation.sin_cos();
    (0..steps)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / steps as f64;
            let x1 = a * theta.cos();
            let y1 = b * theta.sin();
            CanvasPoint::new(
                x1 * cos_r + y1 * sin_r + center.x,
                y1 * cos_r - x1 * sin_r + center.y,
            )
        })
        .collect()
}

/// Builds the defect overlay of a tile from its current container rect.
#[derive(Clone, Debug)]
pub struct OverlayProjector {
    font: FontScaler,
    samples: usize,
    label_fields: Vec<LabelField>,
    label_color: Color,
}

impl OverlayProjector {
    pub fn new(config: &OverlayConfig, label_fields: Vec<LabelField>) -> Self {
        Self {
            font: FontScaler::new(config.label_font_size),
            samples: config.ellipse_samples.max(3),
            label_fields,
            label_color: Color::BLACK,
        }
    }

    pub fn font_size(&self) -> u32 {
        self.font.displayed()
    }

    pub fn font(&self) -> &FontScaler {
        &self.font
    }

    pub fn label_fields(&self) -> &[LabelField] {
        &self.label_fields
    }

    /// Update the font after a zoom tick of factor `s`.
    pub fn on_zoom(&mut self, s: f64) -> u32 {
        self.font.apply(s)
    }

    /// Oriented outline of one defect in the given colour. The ellipse
    /// spans the defect's `height` along x and `width` along y.
    pub fn defect_outline(
        &self,
        defect: &Defect,
        tile: &TileRecord,
        container: &CanvasRect,
        color: Color,
    ) -> OverlayShape {
        let center = project(defect.position(), tile, container);
        let a = defect.height * container.width() / tile.width_um;
        let b = defect.width * container.height() / tile.height_um;
        OverlayShape::Polygon {
            points: poly_oval(center, a, b, defect.orientation, self.samples),
            outline: color,
            width: DEFECT_MARK_LINE_WIDTH,
        }
    }

    pub fn defect_label(&self, defect: &Defect, tile: &TileRecord, container: &CanvasRect) -> OverlayShape {
        let center = project(defect.position(), tile, container);
        OverlayShape::Text {
            anchor: CanvasPoint::new(
                center.x - container.width() / LABEL_OFFSET_DIVISOR,
                center.y - container.height() / LABEL_OFFSET_DIVISOR,
            ),
            text: defect.label_text(&self.label_fields),
            font_size: self.font.displayed(),
            color: self.label_color,
        }
    }

    /// Fill `scene` with both binning outlines and a label for each defect.
    pub fn populate<'a>(
        &self,
        scene: &mut OverlayScene,
        defects: impl IntoIterator<Item = &'a Defect>,
        tile: &TileRecord,
        container: &CanvasRect,
        binning: &BinningConfig,
    ) {
        for defect in defects {
            scene.push(
                OverlayGroup::SizeBinningMarks,
                self.defect_outline(defect, tile, container, binning.size_color(defect.area)),
            );
            scene.push(
                OverlayGroup::ClassBinningMarks,
                self.defect_outline(defect, tile, container, binning.class_color(defect.class_id)),
            );
            scene.push(OverlayGroup::Labels, self.defect_label(defect, tile, container));
        }
    }
}
