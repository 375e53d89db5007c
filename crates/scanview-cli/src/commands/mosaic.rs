use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use scanview_core::geometry::CanvasPoint;
use scanview_core::io::image_io::save_image;
use scanview_core::mosaic::MosaicView;

use super::{band_progress, load_viewer_config, parse_point, LoadedCatalog, SchemeArg};
use crate::{draw, summary};

#[derive(Args)]
pub struct MosaicArgs {
    /// Scan catalog (TOML)
    pub catalog: PathBuf,

    /// Mosaic image; overrides the catalog's mosaic_image
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Integer downscale applied to the mosaic image
    #[arg(long, default_value = "1")]
    pub scale: u32,

    /// Binning scheme for defect dots (defaults to the catalog's)
    #[arg(long, value_enum)]
    pub scheme: Option<SchemeArg>,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report the tile under this mosaic position (X,Y)
    #[arg(long, value_parser = parse_point)]
    pub click: Option<CanvasPoint>,

    /// Output image path
    #[arg(short, long, default_value = "mosaic.png")]
    pub output: PathBuf,
}

pub fn run(args: &MosaicArgs) -> Result<()> {
    let config = load_viewer_config(args.config.as_deref())?;
    let loaded = LoadedCatalog::load(&args.catalog)?;
    let path = match &args.image {
        Some(p) => p.clone(),
        None => loaded.mosaic_path()?,
    };

    let pb = band_progress("Loading mosaic")?;
    let mut view = MosaicView::open(
        &path,
        args.scale,
        &loaded.catalog,
        &config.source,
        &config.overlay,
        |done, total| {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
        },
    )
    .with_context(|| format!("Failed to open mosaic {}", path.display()))?;
    pb.finish_and_clear();

    if let Some(scheme) = args.scheme {
        view.set_binning_scheme(scheme.into());
    }

    let mut frame = view.image().clone();
    draw::draw_items(&mut frame, &view.overlay_items(), CanvasPoint::default(), None);
    save_image(&frame, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    summary::print_mosaic_summary(&path, &view, &loaded.catalog.binning, &args.output);

    if let Some(p) = args.click {
        match view.tile_at(&loaded.catalog, p) {
            Some(tile) => println!(
                "Tile at {},{}: {} ({})",
                p.x, p.y, tile.image_id, tile.file_name
            ),
            None => println!("No tile at {},{}", p.x, p.y),
        }
    }

    Ok(())
}
