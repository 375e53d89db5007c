use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use tracing::debug;

use crate::error::Result;
use crate::geometry::{whole_pixels, whole_pixels_ceil, CanvasPoint, CanvasRect, PixelRect};
use crate::io::raster::RasterSource;
use crate::pyramid::{ImagePyramid, LevelSelection};

use super::state::{ContainerRect, ViewportState};

/// The base image for the visible window, placed in canvas coordinates.
#[derive(Clone, Debug)]
pub struct CompositeImage {
    pub image: RgbImage,
    /// Canvas position of the top-left pixel.
    pub position: CanvasPoint,
    pub level: LevelSelection,
}

/// Which pixels of a level to crop and how large to draw them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropPlan {
    /// Crop rectangle in the chosen level's pixels.
    pub source: PixelRect,
    pub dest_width: u32,
    pub dest_height: u32,
    pub position: CanvasPoint,
}

/// Region the view may scroll over: the union of image and window, except
/// that on an axis where the window already spans the whole image the
/// region collapses to the image extent.
pub fn scroll_region(image: CanvasRect, view: CanvasRect) -> CanvasRect {
    let img = CanvasRect::new(
        whole_pixels(image.x0) as f64,
        whole_pixels(image.y0) as f64,
        whole_pixels(image.x1) as f64,
        whole_pixels(image.y1) as f64,
    );
    let mut region = CanvasRect::new(
        img.x0.min(view.x0),
        img.y0.min(view.y0),
        img.x1.max(view.x1),
        img.y1.max(view.y1),
    );
    if region.x0 == view.x0 && region.x1 == view.x1 {
        region.x0 = img.x0;
        region.x1 = img.x1;
    }
    if region.y0 == view.y0 && region.y1 == view.y1 {
        region.y0 = img.y0;
        region.y1 = img.y1;
    }
    region
}

/// Work out the crop of a `level_size` bitmap that covers the part of
/// `image` visible through `view`. `None` when they do not overlap.
pub fn plan_crop(image: CanvasRect, view: CanvasRect, level_size: (u32, u32)) -> Option<CropPlan> {
    // Image-local coordinates of the visible part.
    let x1 = (view.x0 - image.x0).max(0.0);
    let y1 = (view.y0 - image.y0).max(0.0);
    let x2 = view.x1.min(image.x1) - image.x0;
    let y2 = view.y1.min(image.y1) - image.y0;

    let dest_width = whole_pixels(x2 - x1);
    let dest_height = whole_pixels(y2 - y1);
    if dest_width <= 0 || dest_height <= 0 {
        return None;
    }

    let (lw, lh) = level_size;
    let scale_x = image.width() / lw as f64;
    let scale_y = image.height() / lh as f64;

    let left = whole_pixels(x1 / scale_x).clamp(0, lw as i64 - 1);
    let top = whole_pixels(y1 / scale_y).clamp(0, lh as i64 - 1);
    let right = whole_pixels_ceil(x2 / scale_x).clamp(left + 1, lw as i64);
    let bottom = whole_pixels_ceil(y2 / scale_y).clamp(top + 1, lh as i64);

    Some(CropPlan {
        source: PixelRect::new(left, top, right - left, bottom - top),
        dest_width: dest_width as u32,
        dest_height: dest_height as u32,
        position: CanvasPoint::new(view.x0.max(image.x0), view.y0.max(image.y0)),
    })
}

/// Turns the current viewport into the bitmap to draw behind the overlays.
pub struct ViewportRenderer {
    filter: FilterType,
}

impl ViewportRenderer {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }

    /// Recompute the scroll region, select a level and produce the visible
    /// crop. Returns `Ok(None)` when the window does not show the image.
    pub fn redraw(
        &self,
        state: &mut ViewportState,
        container: &ContainerRect,
        pyramid: &ImagePyramid,
        source: &mut RasterSource,
    ) -> Result<Option<CompositeImage>> {
        let image = container.rect();
        state.set_scroll_region(scroll_region(image, state.view()));
        let view = state.view();

        let level = pyramid.select_level(state.imscale());
        state.set_level(level);
        let level_size = match level {
            LevelSelection::Level(i) => pyramid.level(i).dimensions(),
            LevelSelection::HugeBypass => source.native_size(),
        };

        let Some(plan) = plan_crop(image, view, level_size) else {
            debug!(?view, ?image, "Visible window does not intersect the image");
            return Ok(None);
        };

        let cropped = match level {
            LevelSelection::Level(i) => {
                let s = plan.source;
                imageops::crop_imm(
                    pyramid.level(i),
                    s.x as u32,
                    s.y as u32,
                    s.width as u32,
                    s.height as u32,
                )
                .to_image()
            }
            LevelSelection::HugeBypass => source.decode_region(plan.source)?,
        };

        let image = if cropped.dimensions() == (plan.dest_width, plan.dest_height) {
            cropped
        } else {
            imageops::resize(&cropped, plan.dest_width, plan.dest_height, self.filter)
        };

        debug!(
            ?level,
            crop = ?plan.source,
            dest_width = plan.dest_width,
            dest_height = plan.dest_height,
            "Redrew viewport"
        );

        Ok(Some(CompositeImage {
            image,
            position: plan.position,
            level,
        }))
    }
}

/// Paint the visible window: `background` everywhere, the composite where
/// it lies.
pub fn compose_frame(
    composite: Option<&CompositeImage>,
    view: CanvasRect,
    background: Rgb<u8>,
) -> RgbImage {
    let width = whole_pixels(view.width()).max(1) as u32;
    let height = whole_pixels(view.height()).max(1) as u32;
    let mut frame = RgbImage::from_pixel(width, height, background);
    if let Some(c) = composite {
        let x = whole_pixels(c.position.x - view.x0);
        let y = whole_pixels(c.position.y - view.y0);
        imageops::replace(&mut frame, &c.image, x, y);
    }
    frame
}
