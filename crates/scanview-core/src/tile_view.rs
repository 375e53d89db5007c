//! One opened tile: its source, pyramid, viewport, overlays and
//! measurements, driven by input events.

use std::path::Path;

use image::{Rgb, RgbImage};
use tracing::{debug, info};

use crate::annotation::{AnnotationSession, MeasureTool};
use crate::catalog::{Defect, LabelField, TileRecord};
use crate::config::ViewerConfig;
use crate::error::Result;
use crate::input::{Key, PointerButton, ViewerEvent, WheelDirection};
use crate::io::raster::RasterSource;
use crate::overlay::{
    project, BinningConfig, BinningScheme, OverlayItem, OverlayProjector, OverlayScene,
};
use crate::pyramid::ImagePyramid;
use crate::viewport::{compose_frame, CompositeImage, ContainerRect, ViewportRenderer, ViewportState};

/// Everything needed to open a tile.
pub struct TileSpec<'a> {
    pub tile: TileRecord,
    pub defects: Vec<Defect>,
    pub binning: BinningConfig,
    pub label_fields: Vec<LabelField>,
    pub config: &'a ViewerConfig,
}

pub struct TileView {
    tile: TileRecord,
    defects: Vec<Defect>,
    binning: BinningConfig,
    source: RasterSource,
    pyramid: ImagePyramid,
    state: ViewportState,
    container: ContainerRect,
    renderer: ViewportRenderer,
    projector: OverlayProjector,
    scene: OverlayScene,
    annotations: AnnotationSession,
    composite: Option<CompositeImage>,
    background: Rgb<u8>,
}

impl TileView {
    /// Open `path` as the image of `spec.tile`, build its pyramid and draw the
    /// initial view. Blocks until the pyramid is complete.
    pub fn open(path: &Path, spec: TileSpec<'_>, progress: impl FnMut(usize, usize)) -> Result<Self> {
        spec.tile.validate()?;
        let source = RasterSource::open(path, &spec.config.source)?;
        Self::with_source(source, spec, progress)
    }

    /// Open an image with no scan metadata: one micron per pixel, no defects.
    pub fn open_image(
        path: &Path,
        config: &ViewerConfig,
        progress: impl FnMut(usize, usize),
    ) -> Result<Self> {
        let source = RasterSource::open(path, &config.source)?;
        let (width, height) = source.native_size();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let spec = TileSpec {
            tile: TileRecord::for_image(name, width, height),
            defects: Vec::new(),
            binning: BinningConfig::default(),
            label_fields: Vec::new(),
            config,
        };
        Self::with_source(source, spec, progress)
    }

    fn with_source(
        mut source: RasterSource,
        spec: TileSpec<'_>,
        progress: impl FnMut(usize, usize),
    ) -> Result<Self> {
        let TileSpec {
            tile,
            defects,
            binning,
            label_fields,
            config,
        } = spec;

        let pyramid = ImagePyramid::build(&mut source, &config.source, progress)?;
        let (width, height) = source.native_size();

        let defects: Vec<Defect> = defects
            .into_iter()
            .filter(|d| d.image_id == tile.image_id)
            .collect();

        let container = ContainerRect::new(width, height);
        let projector = OverlayProjector::new(&config.overlay, label_fields);
        let mut scene = OverlayScene::new(binning.scheme);
        if !config.overlay.image_view_only {
            projector.populate(&mut scene, &defects, &tile, &container.rect(), &binning);
        }

        info!(
            image_id = tile.image_id,
            width,
            height,
            defects = defects.len(),
            levels = pyramid.len(),
            "Opened tile"
        );

        let mut view = Self {
            tile,
            defects,
            binning,
            source,
            pyramid,
            state: ViewportState::new(&config.viewport),
            container,
            renderer: ViewportRenderer::new(config.source.filter.filter_type()),
            projector,
            scene,
            annotations: AnnotationSession::new(),
            composite: None,
            background: Rgb([0, 0, 0]),
        };
        view.redraw()?;
        Ok(view)
    }

    pub fn handle_event(&mut self, event: ViewerEvent) -> Result<()> {
        match event {
            ViewerEvent::Resize { width, height } => {
                self.state.resize(width, height);
                self.redraw()
            }
            ViewerEvent::PointerPress { button, x, y } => {
                match button {
                    PointerButton::Primary => self.state.scan_mark(x, y),
                    PointerButton::Secondary => {
                        let p = self.state.to_canvas(x, y);
                        self.annotations.press(p);
                    }
                }
                Ok(())
            }
            ViewerEvent::PointerDrag { button, x, y } => match button {
                PointerButton::Primary => {
                    if self.state.scan_dragto(x, y) {
                        self.redraw()
                    } else {
                        Ok(())
                    }
                }
                PointerButton::Secondary => {
                    let p = self.state.to_canvas(x, y);
                    self.annotations.drag(p);
                    Ok(())
                }
            },
            ViewerEvent::PointerRelease { button, x, y } => {
                match button {
                    PointerButton::Primary => self.state.end_scan(),
                    PointerButton::Secondary => {
                        let p = self.state.to_canvas(x, y);
                        let imscale = self.state.imscale();
                        let font = self.projector.font_size();
                        self.annotations.release(p, &self.tile, imscale, font);
                    }
                }
                Ok(())
            }
            ViewerEvent::Wheel { direction, x, y } => self.zoom(direction, x, y),
            ViewerEvent::Key { key } => self.key(key),
        }
    }

    fn key(&mut self, key: Key) -> Result<()> {
        if let Some((ux, uy)) = key.scroll_units() {
            self.state.scroll_units(ux, uy);
            return self.redraw();
        }
        match key {
            Key::Return => self.annotations.clear(),
            Key::Escape => self.annotations.cancel(),
            _ => {}
        }
        Ok(())
    }

    /// Zoom one tick about the window point `(x, y)`. Ignored outside the
    /// image and when a zoom guard refuses.
    fn zoom(&mut self, direction: WheelDirection, x: f64, y: f64) -> Result<()> {
        let p = self.state.to_canvas(x, y);
        if !self.container.contains_strict(p) {
            debug!(x = p.x, y = p.y, "Zoom outside the image ignored");
            return Ok(());
        }
        let (w, h) = self.source.native_size();
        let Some(s) = self.state.try_zoom(direction, w.min(h)) else {
            return Ok(());
        };

        self.container.scale_about(p, s);
        self.scene.scale_about(p, s);
        self.annotations.scale_about(p, s);
        let font = self.projector.on_zoom(s);
        self.scene.set_font_size(font);
        self.annotations.set_font_size(font);
        self.redraw()
    }

    /// Redraw the base image for the current viewport.
    pub fn redraw(&mut self) -> Result<()> {
        self.composite = self.renderer.redraw(
            &mut self.state,
            &self.container,
            &self.pyramid,
            &mut self.source,
        )?;
        Ok(())
    }

    pub fn set_binning_scheme(&mut self, scheme: BinningScheme) {
        self.binning.scheme = scheme;
        self.scene.visibility_mut().set_scheme(scheme);
    }

    pub fn set_marks_hidden(&mut self, hidden: bool) {
        self.scene.visibility_mut().set_marks_hidden(hidden);
    }

    pub fn set_labels_hidden(&mut self, hidden: bool) {
        self.scene.visibility_mut().set_labels_hidden(hidden);
    }

    pub fn set_measure_tool(&mut self, tool: Option<MeasureTool>) {
        self.annotations.set_tool(tool);
    }

    /// Visible overlay items: defect marks and labels, then measurements.
    pub fn overlay_items(&self) -> Vec<OverlayItem> {
        let visibility = self.scene.visibility();
        let mut items: Vec<OverlayItem> = self.scene.visible_items().cloned().collect();
        items.extend(
            self.annotations
                .items()
                .into_iter()
                .filter(|item| visibility.is_visible(item.group)),
        );
        items
    }

    /// Defects whose projected centre lies in the visible window.
    pub fn visible_defects(&self) -> Vec<&Defect> {
        let view = self.state.view();
        let container = self.container.rect();
        self.defects
            .iter()
            .filter(|d| view.contains(project(d.position(), &self.tile, &container)))
            .collect()
    }

    /// Cumulative zoom factor relative to native resolution.
    pub fn current_scale(&self) -> f64 {
        self.state.imscale()
    }

    /// The visible window with the base image composited, without overlays.
    pub fn render_frame(&self) -> RgbImage {
        compose_frame(self.composite.as_ref(), self.state.view(), self.background)
    }

    pub fn composite(&self) -> Option<&CompositeImage> {
        self.composite.as_ref()
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn container(&self) -> &ContainerRect {
        &self.container
    }

    pub fn pyramid(&self) -> &ImagePyramid {
        &self.pyramid
    }

    pub fn source(&self) -> &RasterSource {
        &self.source
    }

    pub fn tile(&self) -> &TileRecord {
        &self.tile
    }

    pub fn defects(&self) -> &[Defect] {
        &self.defects
    }

    pub fn binning(&self) -> &BinningConfig {
        &self.binning
    }

    pub fn scene(&self) -> &OverlayScene {
        &self.scene
    }

    pub fn annotations(&self) -> &AnnotationSession {
        &self.annotations
    }

    pub fn font_size(&self) -> u32 {
        self.projector.font_size()
    }
}
