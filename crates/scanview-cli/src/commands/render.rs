use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use scanview_core::config::ViewerConfig;
use scanview_core::geometry::CanvasPoint;
use scanview_core::input::{PointerButton, ViewerEvent, WheelDirection};
use scanview_core::io::image_io::save_image;
use scanview_core::mosaic::MosaicView;
use scanview_core::overlay::OverlayItem;
use scanview_core::tile_view::{TileSpec, TileView};

use super::{
    band_progress, load_viewer_config, parse_point, parse_span, LoadedCatalog, SchemeArg, Span,
    ToolArg,
};
use crate::{draw, summary};

#[derive(Args)]
pub struct RenderArgs {
    /// Tile image; overrides the path the catalog gives for the tile
    pub image: Option<PathBuf>,

    /// Scan catalog (TOML)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Image id of the catalog tile to open
    #[arg(long, conflicts_with = "click")]
    pub tile: Option<u64>,

    /// Open the tile under this mosaic position (X,Y)
    #[arg(long, value_parser = parse_point)]
    pub click: Option<CanvasPoint>,

    /// Integer downscale of the mosaic image used with --click
    #[arg(long, default_value = "1")]
    pub mosaic_scale: u32,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Wheel ticks to apply: positive zooms in, negative zooms out
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub zoom: i32,

    /// Window point to zoom about (X,Y); defaults to the window centre
    #[arg(long, value_parser = parse_point)]
    pub at: Option<CanvasPoint>,

    /// Pan the view by DX,DY window pixels after zooming
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub pan: Option<CanvasPoint>,

    /// Binning scheme for defect marks (defaults to the catalog's)
    #[arg(long, value_enum)]
    pub scheme: Option<SchemeArg>,

    /// Hide defect marks
    #[arg(long)]
    pub hide_marks: bool,

    /// Hide defect labels
    #[arg(long)]
    pub hide_labels: bool,

    /// Measurement tool used with --span
    #[arg(long, value_enum, requires = "span")]
    pub measure: Option<ToolArg>,

    /// Measurement gesture from X0,Y0 to X1,Y1 in window pixels
    #[arg(long, value_parser = parse_span, allow_hyphen_values = true)]
    pub span: Option<Span>,

    /// Replay input events from a TOML file of [[events]] tables
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// TrueType/OpenType font for label text; a system font is used if omitted
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Output image path
    #[arg(short, long, default_value = "view.png")]
    pub output: PathBuf,

    /// Also write the visible overlay items as TOML
    #[arg(long)]
    pub scene: Option<PathBuf>,
}

#[derive(Deserialize)]
struct EventScript {
    #[serde(default)]
    events: Vec<ViewerEvent>,
}

#[derive(Serialize)]
struct SceneDump<'a> {
    scale: f64,
    font_size: u32,
    items: &'a [OverlayItem],
}

pub fn run(args: &RenderArgs) -> Result<()> {
    let mut config = load_viewer_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.viewport.canvas_width = width;
    }
    if let Some(height) = args.height {
        config.viewport.canvas_height = height;
    }

    let pb = band_progress("Building pyramid")?;
    let progress = |done: usize, total: usize| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
    };
    let mut view = match &args.catalog {
        Some(path) => open_from_catalog(args, path, &config, progress)?,
        None => {
            let image = args
                .image
                .as_ref()
                .context("Specify an image or --catalog")?;
            TileView::open_image(image, &config, progress)
                .with_context(|| format!("Failed to open {}", image.display()))?
        }
    };
    pb.finish_and_clear();

    apply_gestures(&mut view, args)?;
    if let Some(ref path) = args.events {
        replay_events(&mut view, path)?;
    }

    let font = draw::LabelFont::resolve(args.font.as_deref())?;
    let mut frame = view.render_frame();
    let items = view.overlay_items();
    let skipped = draw::draw_items(&mut frame, &items, view.state().view().origin(), font.as_ref());
    if skipped > 0 {
        warn!(skipped, "No label font found, text left to the scene dump");
    }

    save_image(&frame, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    if let Some(ref path) = args.scene {
        let dump = SceneDump {
            scale: view.current_scale(),
            font_size: view.font_size(),
            items: &items,
        };
        let toml_str = toml::to_string_pretty(&dump)?;
        std::fs::write(path, toml_str)
            .with_context(|| format!("Failed to write scene to {}", path.display()))?;
    }

    summary::print_render_summary(&view, &args.output);
    Ok(())
}

fn open_from_catalog(
    args: &RenderArgs,
    path: &Path,
    config: &ViewerConfig,
    progress: impl FnMut(usize, usize),
) -> Result<TileView> {
    let loaded = LoadedCatalog::load(path)?;
    let catalog = &loaded.catalog;

    let image_id = match (args.tile, args.click) {
        (Some(id), _) => id,
        (None, Some(p)) => {
            let mosaic_path = loaded.mosaic_path()?;
            let mosaic = MosaicView::open(
                &mosaic_path,
                args.mosaic_scale,
                catalog,
                &config.source,
                &config.overlay,
                |_, _| {},
            )
            .with_context(|| format!("Failed to open mosaic {}", mosaic_path.display()))?;
            mosaic
                .tile_at(catalog, p)
                .with_context(|| format!("No tile at mosaic position {},{}", p.x, p.y))?
                .image_id
        }
        (None, None) => bail!("Specify --tile or --click together with --catalog"),
    };

    let tile = catalog.tile(image_id)?.clone();
    let image = match &args.image {
        Some(p) => p.clone(),
        None => loaded.tile_path(&tile.file_name),
    };
    info!(image_id, path = %image.display(), "Opening tile");

    let spec = TileSpec {
        tile,
        defects: catalog.defects_on(image_id).cloned().collect(),
        binning: catalog.binning.clone(),
        label_fields: catalog.label_fields.clone(),
        config,
    };
    TileView::open(&image, spec, progress)
        .with_context(|| format!("Failed to open tile {}", image.display()))
}

/// Replay the gestures given on the command line: zoom, then pan, then one
/// measurement.
fn apply_gestures(view: &mut TileView, args: &RenderArgs) -> Result<()> {
    if let Some(scheme) = args.scheme {
        view.set_binning_scheme(scheme.into());
    }
    view.set_marks_hidden(args.hide_marks);
    view.set_labels_hidden(args.hide_labels);

    let (w, h) = view.state().window_size();
    let centre = CanvasPoint::new(w / 2.0, h / 2.0);

    let at = args.at.unwrap_or(centre);
    let direction = if args.zoom >= 0 {
        WheelDirection::Up
    } else {
        WheelDirection::Down
    };
    for _ in 0..args.zoom.unsigned_abs() {
        view.handle_event(ViewerEvent::Wheel {
            direction,
            x: at.x,
            y: at.y,
        })?;
    }

    if let Some(d) = args.pan {
        drag(view, PointerButton::Primary, centre, CanvasPoint::new(centre.x - d.x, centre.y - d.y))?;
    }

    if let (Some(tool), Some(span)) = (args.measure, args.span) {
        view.set_measure_tool(Some(tool.into()));
        drag(view, PointerButton::Secondary, span.from, span.to)?;
    }
    Ok(())
}

fn drag(view: &mut TileView, button: PointerButton, from: CanvasPoint, to: CanvasPoint) -> Result<()> {
    let events = [
        ViewerEvent::PointerPress {
            button,
            x: from.x,
            y: from.y,
        },
        ViewerEvent::PointerDrag {
            button,
            x: to.x,
            y: to.y,
        },
        ViewerEvent::PointerRelease {
            button,
            x: to.x,
            y: to.y,
        },
    ];
    for event in events {
        view.handle_event(event)?;
    }
    Ok(())
}

fn replay_events(view: &mut TileView, path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read events {}", path.display()))?;
    let script: EventScript =
        toml::from_str(&contents).with_context(|| format!("Invalid events {}", path.display()))?;
    let count = script.events.len();
    for event in script.events {
        view.handle_event(event)?;
    }
    debug!(count, "Replayed events");
    Ok(())
}
