pub mod config;
pub mod info;
pub mod mosaic;
pub mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use scanview_core::annotation::MeasureTool;
use scanview_core::catalog::ScanCatalog;
use scanview_core::config::ViewerConfig;
use scanview_core::geometry::CanvasPoint;
use scanview_core::overlay::BinningScheme;

#[derive(Clone, Copy, ValueEnum)]
pub enum SchemeArg {
    Size,
    Class,
}

impl From<SchemeArg> for BinningScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Size => BinningScheme::Size,
            SchemeArg::Class => BinningScheme::Class,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ToolArg {
    Line,
    Circle,
}

impl From<ToolArg> for MeasureTool {
    fn from(arg: ToolArg) -> Self {
        match arg {
            ToolArg::Line => MeasureTool::Line,
            ToolArg::Circle => MeasureTool::Circle,
        }
    }
}

/// Read a viewer config from TOML, or the defaults when no path is given.
pub fn load_viewer_config(path: Option<&Path>) -> Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("Invalid viewer config {}", path.display()))
}

/// A catalog and the directory its relative paths resolve against.
pub struct LoadedCatalog {
    pub catalog: ScanCatalog,
    pub base: PathBuf,
}

impl LoadedCatalog {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let catalog: ScanCatalog = toml::from_str(&contents)
            .with_context(|| format!("Invalid catalog {}", path.display()))?;
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self { catalog, base })
    }

    pub fn tile_path(&self, file_name: &str) -> PathBuf {
        match &self.catalog.image_dir {
            Some(dir) => self.base.join(dir).join(file_name),
            None => self.base.join(file_name),
        }
    }

    pub fn mosaic_path(&self) -> Result<PathBuf> {
        self.catalog
            .mosaic_image
            .as_ref()
            .map(|p| self.base.join(p))
            .context("Catalog has no mosaic_image")
    }
}

/// Progress bar fed with `(done, total)` band counts.
pub fn band_progress(message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message(message);
    Ok(pb)
}

/// Parse `X,Y`.
pub fn parse_point(s: &str) -> std::result::Result<CanvasPoint, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad X in '{s}': {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad Y in '{s}': {e}"))?;
    Ok(CanvasPoint::new(x, y))
}

#[derive(Clone, Copy, Debug)]
pub struct Span {
    pub from: CanvasPoint,
    pub to: CanvasPoint,
}

/// Parse `X0,Y0,X1,Y1`.
pub fn parse_span(s: &str) -> std::result::Result<Span, String> {
    let values: Vec<f64> = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("bad span '{s}': {e}"))?;
    match values[..] {
        [x0, y0, x1, y1] => Ok(Span {
            from: CanvasPoint::new(x0, y0),
            to: CanvasPoint::new(x1, y1),
        }),
        _ => Err(format!("expected X0,Y0,X1,Y1, got '{s}'")),
    }
}
