//! Zoom/scroll state and the redraw of the visible crop.

mod renderer;
mod state;

pub use renderer::{compose_frame, plan_crop, scroll_region, CompositeImage, CropPlan, ViewportRenderer};
pub use state::{ContainerRect, ViewportState};
