//! Points and rectangles in the three coordinate systems the viewer uses:
//! microns (defect table), source pixels (raster files) and canvas pixels
//! (the zoomed, scrolled drawing surface).

use serde::{Deserialize, Serialize};

use crate::consts::SNAP_EPSILON;

/// A position in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scale this point about `origin` by `factor`, as the canvas does for
    /// every item on a zoom tick.
    pub fn scaled_about(self, origin: CanvasPoint, factor: f64) -> Self {
        Self {
            x: origin.x + (self.x - origin.x) * factor,
            y: origin.y + (self.y - origin.y) * factor,
        }
    }

    pub fn distance_to(self, other: CanvasPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// A position inside a tile, in microns from the tile's top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MicronPoint {
    pub x: f64,
    pub y: f64,
}

impl MicronPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in canvas pixels, stored as its two corners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl CanvasRect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn origin(&self) -> CanvasPoint {
        CanvasPoint::new(self.x0, self.y0)
    }

    /// Strict containment: points on the border are outside.
    pub fn contains_strict(&self, p: CanvasPoint) -> bool {
        self.x0 < p.x && p.x < self.x1 && self.y0 < p.y && p.y < self.y1
    }

    /// Inclusive containment: points on the border are inside.
    pub fn contains(&self, p: CanvasPoint) -> bool {
        self.x0 <= p.x && p.x <= self.x1 && self.y0 <= p.y && p.y <= self.y1
    }

    pub fn scaled_about(self, origin: CanvasPoint, factor: f64) -> Self {
        let a = CanvasPoint::new(self.x0, self.y0).scaled_about(origin, factor);
        let b = CanvasPoint::new(self.x1, self.y1).scaled_about(origin, factor);
        Self::new(a.x, a.y, b.x, b.y)
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x0 + dx, self.y0 + dy, self.x1 + dx, self.y1 + dy)
    }
}

/// An axis-aligned rectangle in source pixels. Signed so that requests
/// partially outside the image can be expressed before clipping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clip to `[0, w] x [0, h]`. Returns `None` when nothing remains.
    pub fn clipped(&self, w: u32, h: u32) -> Option<ClippedRect> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x + self.width).min(w as i64);
        let y1 = (self.y + self.height).min(h as i64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(ClippedRect {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }
}

/// A non-empty rectangle known to lie inside its image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClippedRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Truncate to whole pixels, treating values within a hair of the next
/// integer as that integer. Absorbs the error that builds up in container
/// coordinates after many incremental scale operations.
pub fn whole_pixels(v: f64) -> i64 {
    (v + SNAP_EPSILON).floor() as i64
}

/// Round up to whole pixels with the same tolerance as [`whole_pixels`].
pub fn whole_pixels_ceil(v: f64) -> i64 {
    (v - SNAP_EPSILON).ceil() as i64
}
