/// Longer-side size (pixels) above which a source counts as huge when
/// squared; also the longer side of the level-0 proxy built for huge sources.
pub const DEFAULT_HUGE_SIZE: u32 = 14_000;

/// Number of rows decoded at a time from a huge source.
pub const DEFAULT_BAND_HEIGHT: u32 = 1024;

/// Pyramid reduction stops once either side of a level drops to this size.
pub const DEFAULT_PYRAMID_CUTOFF: u32 = 512;

/// Zoom multiplier applied per wheel tick.
pub const DEFAULT_ZOOM_STEP: f64 = 1.3;

/// Size ratio between consecutive pyramid levels. Equal to the zoom step so
/// level selection lands on whole levels.
pub const DEFAULT_PYRAMID_REDUCTION: f64 = 1.3;

/// Zoom-out stops before the shorter native side renders smaller than this.
pub const DEFAULT_MIN_RENDERED_SIDE: f64 = 30.0;

/// Number of vertices in the polygon that approximates a rotated ellipse.
pub const DEFAULT_ELLIPSE_SAMPLES: usize = 50;

/// Initial font size (pixels) for defect labels and measurement labels.
pub const DEFAULT_LABEL_FONT_SIZE: f64 = 20.0;

/// Labels sit up-left of their defect by container extent / this divisor.
pub const LABEL_OFFSET_DIVISOR: f64 = 60.0;

/// Fraction of the visible window scrolled by one arrow/WASD key press.
pub const DEFAULT_KEY_SCROLL_FRACTION: f64 = 0.1;

/// Default canvas size used before the host reports a real one.
pub const DEFAULT_CANVAS_WIDTH: u32 = 800;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 600;

/// Radius (pixels) of defect dots on the mosaic.
pub const DEFAULT_MOSAIC_MARK_SIZE: f64 = 3.0;

/// Stroke width of defect outlines on a tile.
pub const DEFECT_MARK_LINE_WIDTH: f64 = 2.0;

/// Stroke width of measurement lines.
pub const MEASUREMENT_LINE_WIDTH: f64 = 2.0;

/// Tolerance used when snapping accumulated floating-point values to whole
/// pixels or whole font sizes.
pub const SNAP_EPSILON: f64 = 1e-6;

/// Tolerance used by the font accumulator when choosing floor/ceil.
pub const FONT_EPSILON: f64 = 1e-9;

/// Bytes per pixel of every decoded bitmap (RGB8).
pub const OUTPUT_BYTES_PER_PIXEL: usize = 3;
