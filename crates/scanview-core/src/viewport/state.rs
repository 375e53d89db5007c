use tracing::debug;

use crate::config::ViewportConfig;
use crate::geometry::{CanvasPoint, CanvasRect};
use crate::input::WheelDirection;
use crate::pyramid::LevelSelection;

/// Zoom, scroll and level selection of one tile view.
///
/// The cumulative zoom is stored as a signed tick count so that zooming in
/// and back out by the same number of ticks restores it exactly.
#[derive(Clone, Debug)]
pub struct ViewportState {
    zoom_step: f64,
    zoom_ticks: i32,
    min_rendered_side: f64,
    key_scroll_fraction: f64,
    view: CanvasRect,
    level: LevelSelection,
    scroll_region: CanvasRect,
    scan: Option<ScanMark>,
}

/// Pointer position and view origin remembered when a pan starts.
#[derive(Clone, Copy, Debug)]
struct ScanMark {
    pointer: CanvasPoint,
    origin: CanvasPoint,
}

impl ViewportState {
    pub fn new(config: &ViewportConfig) -> Self {
        let view = CanvasRect::from_origin_size(
            0.0,
            0.0,
            config.canvas_width as f64,
            config.canvas_height as f64,
        );
        Self {
            zoom_step: config.zoom_step,
            zoom_ticks: 0,
            min_rendered_side: config.min_rendered_side,
            key_scroll_fraction: config.key_scroll_fraction,
            view,
            level: LevelSelection::Level(0),
            scroll_region: view,
            scan: None,
        }
    }

    /// Cumulative zoom factor, `zoom_step ^ ticks`.
    pub fn imscale(&self) -> f64 {
        self.zoom_step.powi(self.zoom_ticks)
    }

    pub fn zoom_ticks(&self) -> i32 {
        self.zoom_ticks
    }

    pub fn zoom_step(&self) -> f64 {
        self.zoom_step
    }

    /// The visible window in canvas coordinates.
    pub fn view(&self) -> CanvasRect {
        self.view
    }

    pub fn window_size(&self) -> (f64, f64) {
        (self.view.width(), self.view.height())
    }

    pub fn level(&self) -> LevelSelection {
        self.level
    }

    pub fn set_level(&mut self, level: LevelSelection) {
        self.level = level;
    }

    pub fn scroll_region(&self) -> CanvasRect {
        self.scroll_region
    }

    /// Convert a window position to canvas coordinates.
    pub fn to_canvas(&self, x: f64, y: f64) -> CanvasPoint {
        CanvasPoint::new(self.view.x0 + x, self.view.y0 + y)
    }

    /// Keep the origin, change the window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.view =
            CanvasRect::from_origin_size(self.view.x0, self.view.y0, width as f64, height as f64);
    }

    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.view = self.view.translated(dx, dy);
    }

    /// Scroll by whole units, one unit being a fixed fraction of the window,
    /// without leaving the current scroll region.
    pub fn scroll_units(&mut self, ux: i32, uy: i32) {
        let (w, h) = self.window_size();
        self.scroll_by(
            ux as f64 * w * self.key_scroll_fraction,
            uy as f64 * h * self.key_scroll_fraction,
        );
        self.confine();
    }

    /// Remember where a pan started.
    pub fn scan_mark(&mut self, x: f64, y: f64) {
        self.scan = Some(ScanMark {
            pointer: CanvasPoint::new(x, y),
            origin: self.view.origin(),
        });
    }

    /// Drag the view so the marked point follows the pointer, confined to the
    /// current scroll region. Returns false when no pan is in progress.
    pub fn scan_dragto(&mut self, x: f64, y: f64) -> bool {
        let Some(mark) = self.scan else {
            return false;
        };
        let (w, h) = self.window_size();
        let x0 = mark.origin.x - (x - mark.pointer.x);
        let y0 = mark.origin.y - (y - mark.pointer.y);
        self.view = CanvasRect::from_origin_size(x0, y0, w, h);
        self.confine();
        true
    }

    pub fn end_scan(&mut self) {
        self.scan = None;
    }

    /// Record the scroll region and pull the view back inside it.
    pub fn set_scroll_region(&mut self, region: CanvasRect) {
        self.scroll_region = region;
        self.confine();
    }

    fn confine(&mut self) {
        let region = self.scroll_region;
        let (w, h) = self.window_size();
        let x0 = confine_axis(self.view.x0, w, region.x0, region.x1);
        let y0 = confine_axis(self.view.y0, h, region.y0, region.y1);
        self.view = CanvasRect::from_origin_size(x0, y0, w, h);
    }

    /// Advance the zoom by one tick if the guards allow it and return the
    /// incremental factor to scale the canvas by.
    ///
    /// Zoom-out is refused when the shorter native side would render below
    /// the minimum; zoom-in is refused when one source pixel would grow past
    /// half the shorter window side.
    pub fn try_zoom(&mut self, direction: WheelDirection, min_native_side: u32) -> Option<f64> {
        let imscale = self.imscale();
        match direction {
            WheelDirection::Down => {
                let rendered = (min_native_side as f64 * imscale / self.zoom_step).round();
                if rendered < self.min_rendered_side {
                    debug!(imscale, rendered, "Zoom-out refused");
                    return None;
                }
                self.zoom_ticks -= 1;
                Some(1.0 / self.zoom_step)
            }
            WheelDirection::Up => {
                let (w, h) = self.window_size();
                let limit = (w.min(h) as i64 / 2) as f64;
                if imscale * self.zoom_step > limit {
                    debug!(imscale, limit, "Zoom-in refused");
                    return None;
                }
                self.zoom_ticks += 1;
                Some(self.zoom_step)
            }
        }
    }
}

/// Shift `origin` so the window `[origin, origin + size]` stays inside
/// `[r0, r1]` on one axis. When the window is larger than the region on both
/// sides it is left alone.
fn confine_axis(origin: f64, size: f64, r0: f64, r1: f64) -> f64 {
    let left = origin - r0;
    let right = r1 - (origin + size);
    if left < 0.0 && right > 0.0 {
        origin + (-left).min(right)
    } else if right < 0.0 && left > 0.0 {
        origin - left.min(-right)
    } else {
        origin
    }
}

/// Full native-size rectangle of the image in canvas coordinates.
///
/// Only ever changed by [`ContainerRect::scale_about`], in lockstep with
/// every other canvas item, and read back on each redraw as the
/// authoritative image bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerRect {
    rect: CanvasRect,
}

impl ContainerRect {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            rect: CanvasRect::new(0.0, 0.0, width as f64, height as f64),
        }
    }

    pub fn rect(&self) -> CanvasRect {
        self.rect
    }

    pub fn scale_about(&mut self, origin: CanvasPoint, factor: f64) {
        self.rect = self.rect.scaled_about(origin, factor);
    }

    pub fn contains_strict(&self, p: CanvasPoint) -> bool {
        self.rect.contains_strict(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confine_pulls_window_back_inside() {
        assert_eq!(confine_axis(-50.0, 100.0, 0.0, 400.0), 0.0);
        assert_eq!(confine_axis(350.0, 100.0, 0.0, 400.0), 300.0);
        assert_eq!(confine_axis(100.0, 100.0, 0.0, 400.0), 100.0);
    }

    #[test]
    fn confine_leaves_window_larger_than_region() {
        assert_eq!(confine_axis(-10.0, 500.0, 0.0, 400.0), -10.0);
    }

    #[test]
    fn confine_shifts_by_overhang() {
        // Overhangs on the left only.
        assert_eq!(confine_axis(-10.0, 500.0, 0.0, 600.0), 0.0);
    }
}
