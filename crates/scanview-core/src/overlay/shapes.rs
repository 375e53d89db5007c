use std::collections::HashMap;

use serde::Serialize;

use crate::geometry::CanvasPoint;

use super::binning::BinningScheme;
use super::color::Color;

/// A vector item drawn over the base image, in canvas coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum OverlayShape {
    /// Closed outline.
    Polygon {
        points: Vec<CanvasPoint>,
        outline: Color,
        width: f64,
    },
    /// Filled disc.
    Dot {
        center: CanvasPoint,
        radius: f64,
        color: Color,
    },
    /// Circle outline.
    Circle {
        center: CanvasPoint,
        radius: f64,
        outline: Color,
        width: f64,
    },
    Line {
        from: CanvasPoint,
        to: CanvasPoint,
        color: Color,
        width: f64,
    },
    /// Text centred on `anchor`.
    Text {
        anchor: CanvasPoint,
        text: String,
        font_size: u32,
        color: Color,
    },
}

impl OverlayShape {
    /// Scale positions about `origin`. Stroke widths and font sizes are
    /// left alone, the way a canvas scales its items.
    pub fn scale_about(&mut self, origin: CanvasPoint, factor: f64) {
        match self {
            OverlayShape::Polygon { points, .. } => {
                for p in points.iter_mut() {
                    *p = p.scaled_about(origin, factor);
                }
            }
            OverlayShape::Dot { center, radius, .. }
            | OverlayShape::Circle { center, radius, .. } => {
                *center = center.scaled_about(origin, factor);
                *radius *= factor;
            }
            OverlayShape::Line { from, to, .. } => {
                *from = from.scaled_about(origin, factor);
                *to = to.scaled_about(origin, factor);
            }
            OverlayShape::Text { anchor, .. } => {
                *anchor = anchor.scaled_about(origin, factor);
            }
        }
    }

    pub fn set_font_size(&mut self, size: u32) {
        if let OverlayShape::Text { font_size, .. } = self {
            *font_size = size;
        }
    }
}

/// Group an overlay item belongs to; visibility is switched per group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayGroup {
    SizeBinningMarks,
    ClassBinningMarks,
    Labels,
    MeasurementTemp,
    MeasurementFinal,
}

impl OverlayGroup {
    pub const ALL: [OverlayGroup; 5] = [
        OverlayGroup::SizeBinningMarks,
        OverlayGroup::ClassBinningMarks,
        OverlayGroup::Labels,
        OverlayGroup::MeasurementTemp,
        OverlayGroup::MeasurementFinal,
    ];

    pub fn marks_for(scheme: BinningScheme) -> Self {
        match scheme {
            BinningScheme::Size => OverlayGroup::SizeBinningMarks,
            BinningScheme::Class => OverlayGroup::ClassBinningMarks,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverlayItem {
    pub group: OverlayGroup,
    pub shape: OverlayShape,
}

/// Which groups are drawn. Derived from the active binning scheme and the
/// hide-marks / hide-labels toggles.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayVisibility {
    groups: HashMap<OverlayGroup, bool>,
    scheme: BinningScheme,
    marks_hidden: bool,
    labels_hidden: bool,
}

impl OverlayVisibility {
    pub fn new(scheme: BinningScheme) -> Self {
        let mut vis = Self {
            groups: OverlayGroup::ALL.iter().map(|&g| (g, true)).collect(),
            scheme,
            marks_hidden: false,
            labels_hidden: false,
        };
        vis.refresh();
        vis
    }

    pub fn is_visible(&self, group: OverlayGroup) -> bool {
        self.groups.get(&group).copied().unwrap_or(false)
    }

    pub fn scheme(&self) -> BinningScheme {
        self.scheme
    }

    pub fn set_scheme(&mut self, scheme: BinningScheme) {
        self.scheme = scheme;
        self.refresh();
    }

    pub fn marks_hidden(&self) -> bool {
        self.marks_hidden
    }

    pub fn set_marks_hidden(&mut self, hidden: bool) {
        self.marks_hidden = hidden;
        self.refresh();
    }

    pub fn labels_hidden(&self) -> bool {
        self.labels_hidden
    }

    pub fn set_labels_hidden(&mut self, hidden: bool) {
        self.labels_hidden = hidden;
        self.refresh();
    }

    fn refresh(&mut self) {
        let active = OverlayGroup::marks_for(self.scheme);
        for group in [OverlayGroup::SizeBinningMarks, OverlayGroup::ClassBinningMarks] {
            self.groups
                .insert(group, !self.marks_hidden && group == active);
        }
        self.groups.insert(OverlayGroup::Labels, !self.labels_hidden);
    }
}

/// The defect overlay of one view: marks and labels for every defect,
/// both binning colourings present at once, with visibility switched per
/// group.
#[derive(Clone, Debug)]
pub struct OverlayScene {
    items: Vec<OverlayItem>,
    visibility: OverlayVisibility,
}

impl OverlayScene {
    pub fn new(scheme: BinningScheme) -> Self {
        Self {
            items: Vec::new(),
            visibility: OverlayVisibility::new(scheme),
        }
    }

    pub fn push(&mut self, group: OverlayGroup, shape: OverlayShape) {
        self.items.push(OverlayItem { group, shape });
    }

    pub fn items(&self) -> &[OverlayItem] {
        &self.items
    }

    pub fn items_in(&self, group: OverlayGroup) -> impl Iterator<Item = &OverlayItem> + '_ {
        self.items.iter().filter(move |item| item.group == group)
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &OverlayItem> + '_ {
        self.items
            .iter()
            .filter(|item| self.visibility.is_visible(item.group))
    }

    pub fn visibility(&self) -> &OverlayVisibility {
        &self.visibility
    }

    pub fn visibility_mut(&mut self) -> &mut OverlayVisibility {
        &mut self.visibility
    }

    pub fn scale_about(&mut self, origin: CanvasPoint, factor: f64) {
        for item in &mut self.items {
            item.shape.scale_about(origin, factor);
        }
    }

    pub fn set_font_size(&mut self, size: u32) {
        for item in &mut self.items {
            item.shape.set_font_size(size);
        }
    }
}
