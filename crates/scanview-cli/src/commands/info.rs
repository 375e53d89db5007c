use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use scanview_core::io::raster::RasterSource;
use scanview_core::pyramid::ImagePyramid;

use super::{band_progress, load_viewer_config};

#[derive(Args)]
pub struct InfoArgs {
    /// Input image (PNG, TIFF, PPM/PGM, ...)
    pub file: PathBuf,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let config = load_viewer_config(args.config.as_deref())?;
    let mut source = RasterSource::open(&args.file, &config.source)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let (width, height) = source.native_size();

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}", width, height);
    if source.is_huge() {
        println!("Huge:        yes (bands of {} rows)", source.band_height());
    } else {
        println!("Huge:        no");
    }
    let total_mb = (width as f64 * height as f64 * 3.0) / (1024.0 * 1024.0);
    println!("Data size:   {:.1} MB as RGB8", total_mb);

    let pb = band_progress("Building pyramid")?;
    let pyramid = ImagePyramid::build(&mut source, &config.source, |done, total| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
    })?;
    pb.finish_and_clear();

    if pyramid.is_huge_proxy() {
        println!("Proxy ratio: {:.3}", pyramid.ratio());
    }
    println!("Levels:      {}", pyramid.len());
    for (i, level) in pyramid.levels().iter().enumerate() {
        println!("  [{}]        {}x{}", i, level.width(), level.height());
    }

    Ok(())
}
