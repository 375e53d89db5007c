//! Circle and line measurements drawn with the secondary pointer button.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::TileRecord;
use crate::consts::MEASUREMENT_LINE_WIDTH;
use crate::geometry::CanvasPoint;
use crate::overlay::{Color, OverlayGroup, OverlayItem, OverlayShape};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureTool {
    /// Area of a circle centred on the press point.
    Circle,
    /// Length from the press point to the release point.
    Line,
}

/// A finished measurement and its label.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeasurementAnnotation {
    pub tool: MeasureTool,
    /// µm² for circles, µm for lines.
    pub value: f64,
    pub shape: OverlayShape,
    pub label: OverlayShape,
}

/// Length in microns of a canvas-space vector at cumulative zoom `imscale`.
///
/// Each axis is converted with the tile's microns-per-pixel ratio, then the
/// zoom is divided out.
pub fn micron_length(dx: f64, dy: f64, tile: &TileRecord, imscale: f64) -> f64 {
    let mx = dx * tile.microns_per_pixel_x();
    let my = dy * tile.microns_per_pixel_y();
    mx.hypot(my) / imscale
}

#[derive(Clone, Debug)]
pub struct AnnotationSession {
    tool: Option<MeasureTool>,
    start: Option<CanvasPoint>,
    temp: Option<OverlayShape>,
    finals: Vec<MeasurementAnnotation>,
    color: Color,
}

impl Default for AnnotationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationSession {
    pub fn new() -> Self {
        Self {
            tool: None,
            start: None,
            temp: None,
            finals: Vec::new(),
            color: Color::RED,
        }
    }

    pub fn tool(&self) -> Option<MeasureTool> {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Option<MeasureTool>) {
        self.tool = tool;
        self.cancel();
    }

    pub fn is_dragging(&self) -> bool {
        self.tool.is_some() && self.start.is_some()
    }

    pub fn annotations(&self) -> &[MeasurementAnnotation] {
        &self.finals
    }

    pub fn temp_shape(&self) -> Option<&OverlayShape> {
        self.temp.as_ref()
    }

    /// Secondary button pressed at canvas point `p`.
    pub fn press(&mut self, p: CanvasPoint) {
        if self.tool.is_some() {
            self.start = Some(p);
        }
    }

    /// Pointer moved to `p` with the secondary button held.
    pub fn drag(&mut self, p: CanvasPoint) {
        let (Some(tool), Some(start)) = (self.tool, self.start) else {
            return;
        };
        self.temp = Some(self.outline(tool, start, p));
    }

    /// Secondary button released at `p`: finalize the measurement.
    pub fn release(
        &mut self,
        p: CanvasPoint,
        tile: &TileRecord,
        imscale: f64,
        font_size: u32,
    ) -> Option<&MeasurementAnnotation> {
        let (Some(tool), Some(start)) = (self.tool, self.start.take()) else {
            return None;
        };
        self.temp = None;

        let length = micron_length(p.x - start.x, p.y - start.y, tile, imscale);
        let shape = self.outline(tool, start, p);
        let (value, text, anchor) = match tool {
            MeasureTool::Circle => {
                let radius = start.distance_to(p);
                let area = std::f64::consts::PI * length * length;
                let corner = CanvasPoint::new(start.x - radius, start.y - radius);
                (area, format!("Area = {area:.2}"), corner)
            }
            MeasureTool::Line => (length, format!("Length = {length:.2}"), start),
        };
        debug!(?tool, value, "Finalized measurement");

        self.finals.push(MeasurementAnnotation {
            tool,
            value,
            shape,
            label: OverlayShape::Text {
                anchor,
                text,
                font_size,
                color: self.color,
            },
        });
        self.finals.last()
    }

    /// Abandon the gesture in progress.
    pub fn cancel(&mut self) {
        self.start = None;
        self.temp = None;
    }

    /// Delete every finished measurement.
    pub fn clear(&mut self) {
        self.finals.clear();
    }

    /// Follow a zoom tick: the press point of a gesture in progress moves
    /// with the canvas, as do all drawn shapes.
    pub fn scale_about(&mut self, origin: CanvasPoint, factor: f64) {
        if let Some(start) = &mut self.start {
            *start = start.scaled_about(origin, factor);
        }
        if let Some(temp) = &mut self.temp {
            temp.scale_about(origin, factor);
        }
        for m in &mut self.finals {
            m.shape.scale_about(origin, factor);
            m.label.scale_about(origin, factor);
        }
    }

    pub fn set_font_size(&mut self, size: u32) {
        for m in &mut self.finals {
            m.label.set_font_size(size);
        }
    }

    /// Temporary and finished shapes, tagged with their groups.
    pub fn items(&self) -> Vec<OverlayItem> {
        let mut items = Vec::with_capacity(self.finals.len() * 2 + 1);
        if let Some(temp) = &self.temp {
            items.push(OverlayItem {
                group: OverlayGroup::MeasurementTemp,
                shape: temp.clone(),
            });
        }
        for m in &self.finals {
            for shape in [&m.shape, &m.label] {
                items.push(OverlayItem {
                    group: OverlayGroup::MeasurementFinal,
                    shape: shape.clone(),
                });
            }
        }
        items
    }

    fn outline(&self, tool: MeasureTool, start: CanvasPoint, end: CanvasPoint) -> OverlayShape {
        match tool {
            MeasureTool::Circle => OverlayShape::Circle {
                center: start,
                radius: start.distance_to(end),
                outline: self.color,
                width: 1.0,
            },
            MeasureTool::Line => OverlayShape::Line {
                from: start,
                to: end,
                color: self.color,
                width: MEASUREMENT_LINE_WIDTH,
            },
        }
    }
}
