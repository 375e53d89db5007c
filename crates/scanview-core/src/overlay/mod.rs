//! Vector overlays: defect marks, labels, and the colour rules behind them.

pub mod binning;
pub mod color;
pub mod projector;
pub mod shapes;

pub use binning::{BinStatistics, BinningConfig, BinningScheme, ClassEntry};
pub use color::Color;
pub use projector::{poly_oval, project, FontScaler, OverlayProjector};
pub use shapes::{OverlayGroup, OverlayItem, OverlayScene, OverlayShape, OverlayVisibility};
