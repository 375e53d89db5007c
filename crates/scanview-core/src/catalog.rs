//! Scan catalog: tile records, the defect table and display choices.
//!
//! All of it is immutable input to the viewer. Hosts load it from whatever
//! store they use; the CLI reads it from TOML.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};
use crate::geometry::MicronPoint;
use crate::overlay::BinningConfig;

/// One image tile of a scan and where it sits in the mosaic grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    pub image_id: u64,
    pub file_name: String,
    pub row: u32,
    pub column: u32,
    pub width_um: f64,
    pub height_um: f64,
    pub width_px: f64,
    pub height_px: f64,
}

impl TileRecord {
    /// A record for a bare image with no scan metadata: one micron per pixel,
    /// placed at the origin of the grid.
    pub fn for_image(file_name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            image_id: 0,
            file_name: file_name.into(),
            row: 0,
            column: 0,
            width_um: width as f64,
            height_um: height as f64,
            width_px: width as f64,
            height_px: height as f64,
        }
    }

    /// Reject sizes that would make micron/pixel conversion divide by zero
    /// or produce non-finite values.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("width_um", self.width_um),
            ("height_um", self.height_um),
            ("width_px", self.width_px),
            ("height_px", self.height_px),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(ViewerError::InvalidTileMetadata {
                    image_id: self.image_id,
                    reason: format!("{name} must be positive, got {value}"),
                });
            }
        }
        Ok(())
    }

    pub fn microns_per_pixel_x(&self) -> f64 {
        self.width_um / self.width_px
    }

    pub fn microns_per_pixel_y(&self) -> f64 {
        self.height_um / self.height_px
    }
}

/// One detected defect. Positions and extents are in microns relative to
/// the tile's top-left corner. `width` runs along the tile's y axis and
/// `height` along x, following the detection tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Defect {
    pub id: u64,
    pub image_id: u64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub area: f64,
    /// Degrees, counter-clockwise.
    #[serde(default)]
    pub orientation: f64,
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub analysis_id: u64,
    #[serde(default)]
    pub device_id: u64,
    #[serde(default)]
    pub intensity: f64,
    #[serde(default)]
    pub intensity_deviation: f64,
    #[serde(default)]
    pub eccentricity: f64,
    #[serde(default)]
    pub x_in_device: f64,
    #[serde(default)]
    pub y_in_device: f64,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub contour: String,
}

impl Defect {
    pub fn position(&self) -> MicronPoint {
        MicronPoint::new(self.x, self.y)
    }

    /// `"<Name> = <value>"` for one label field.
    pub fn field_text(&self, field: LabelField) -> String {
        let value = match field {
            LabelField::DefectId => self.id.to_string(),
            LabelField::ImageId => self.image_id.to_string(),
            LabelField::AnalysisId => self.analysis_id.to_string(),
            LabelField::DeviceId => self.device_id.to_string(),
            LabelField::X => self.x.to_string(),
            LabelField::Y => self.y.to_string(),
            LabelField::W => self.width.to_string(),
            LabelField::H => self.height.to_string(),
            LabelField::Area => self.area.to_string(),
            LabelField::Intensity => self.intensity.to_string(),
            LabelField::IntensityDeviation => self.intensity_deviation.to_string(),
            LabelField::Eccentricity => self.eccentricity.to_string(),
            LabelField::Orientation => self.orientation.to_string(),
            LabelField::XInDevice => self.x_in_device.to_string(),
            LabelField::YInDevice => self.y_in_device.to_string(),
            LabelField::ClassId => self
                .class_id
                .map_or_else(|| "None".to_string(), |c| c.to_string()),
            LabelField::Score => self.score.to_string(),
            LabelField::Contour => self.contour.clone(),
        };
        format!("{} = {}", field.name(), value)
    }

    /// Selected fields joined by `", "`.
    pub fn label_text(&self, fields: &[LabelField]) -> String {
        fields
            .iter()
            .map(|&f| self.field_text(f))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A defect attribute that can appear in its label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelField {
    DefectId,
    ImageId,
    AnalysisId,
    DeviceId,
    X,
    Y,
    W,
    H,
    Area,
    Intensity,
    IntensityDeviation,
    Eccentricity,
    Orientation,
    XInDevice,
    YInDevice,
    ClassId,
    Score,
    Contour,
}

impl LabelField {
    pub const ALL: [LabelField; 18] = [
        LabelField::DefectId,
        LabelField::ImageId,
        LabelField::AnalysisId,
        LabelField::DeviceId,
        LabelField::X,
        LabelField::Y,
        LabelField::W,
        LabelField::H,
        LabelField::Area,
        LabelField::Intensity,
        LabelField::IntensityDeviation,
        LabelField::Eccentricity,
        LabelField::Orientation,
        LabelField::XInDevice,
        LabelField::YInDevice,
        LabelField::ClassId,
        LabelField::Score,
        LabelField::Contour,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LabelField::DefectId => "DefectID",
            LabelField::ImageId => "ImageID",
            LabelField::AnalysisId => "AnalysisID",
            LabelField::DeviceId => "DeviceID",
            LabelField::X => "X",
            LabelField::Y => "Y",
            LabelField::W => "W",
            LabelField::H => "H",
            LabelField::Area => "Area",
            LabelField::Intensity => "Intensity",
            LabelField::IntensityDeviation => "IntensityDeviation",
            LabelField::Eccentricity => "Eccentricity",
            LabelField::Orientation => "Orientation",
            LabelField::XInDevice => "XinDevice",
            LabelField::YInDevice => "YinDevice",
            LabelField::ClassId => "ClassID",
            LabelField::Score => "Score",
            LabelField::Contour => "Contour",
        }
    }
}

pub fn default_label_fields() -> Vec<LabelField> {
    vec![LabelField::X, LabelField::Y, LabelField::Area]
}

/// Everything the viewer needs to know about one scan and analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanCatalog {
    /// Downscaled whole-scan image, relative to the catalog's directory.
    #[serde(default)]
    pub mosaic_image: Option<PathBuf>,
    /// Directory holding the tile images, relative to the catalog's directory.
    #[serde(default)]
    pub image_dir: Option<PathBuf>,
    #[serde(default)]
    pub tiles: Vec<TileRecord>,
    #[serde(default)]
    pub defects: Vec<Defect>,
    #[serde(default)]
    pub binning: BinningConfig,
    #[serde(default = "default_label_fields")]
    pub label_fields: Vec<LabelField>,
}

impl ScanCatalog {
    pub fn tile(&self, image_id: u64) -> Result<&TileRecord> {
        self.tiles
            .iter()
            .find(|t| t.image_id == image_id)
            .ok_or(ViewerError::TileNotFound(image_id))
    }

    /// Defects lying on tile `image_id`.
    pub fn defects_on(&self, image_id: u64) -> impl Iterator<Item = &Defect> + '_ {
        self.defects.iter().filter(move |d| d.image_id == image_id)
    }
}
