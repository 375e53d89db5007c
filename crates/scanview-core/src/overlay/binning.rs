use serde::{Deserialize, Serialize};

use crate::catalog::Defect;

use super::color::Color;

/// Which colouring of the defect marks is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinningScheme {
    #[default]
    Size,
    Class,
}

impl std::fmt::Display for BinningScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Size => write!(f, "Size"),
            Self::Class => write!(f, "Class"),
        }
    }
}

/// A detection class and the colour its defects are drawn in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub id: i64,
    pub name: String,
    /// Unset until the operator assigns one; such classes fall into the
    /// infinity colour.
    #[serde(default)]
    pub color: Option<Color>,
}

/// Colour rules for defect marks.
///
/// Size binning: `thresholds` are ascending bin ceilings in µm², with one
/// colour each; areas above the last ceiling use `infinity_color`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BinningConfig {
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<f64>,
    #[serde(default = "default_colors")]
    pub colors: Vec<Color>,
    #[serde(default = "default_infinity_color")]
    pub infinity_color: Color,
    #[serde(default)]
    pub classes: Vec<ClassEntry>,
    #[serde(default)]
    pub scheme: BinningScheme,
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            thresholds: default_thresholds(),
            colors: default_colors(),
            infinity_color: default_infinity_color(),
            classes: Vec::new(),
            scheme: BinningScheme::default(),
        }
    }
}

fn default_thresholds() -> Vec<f64> {
    vec![16_000.0, 32_000.0, 64_000.0, 112_000.0, 160_000.0]
}

fn default_colors() -> Vec<Color> {
    vec![
        Color::rgb(0, 255, 255),
        Color::rgb(102, 205, 0),
        Color::rgb(58, 95, 205),
        Color::rgb(255, 193, 37),
        Color::rgb(205, 0, 205),
    ]
}

fn default_infinity_color() -> Color {
    Color::RED
}

impl BinningConfig {
    /// Index of the first threshold `>= area`, or `None` for the infinity bin.
    pub fn size_bin(&self, area: f64) -> Option<usize> {
        let idx = self.thresholds.partition_point(|&t| t < area);
        (idx < self.thresholds.len()).then_some(idx)
    }

    pub fn size_color(&self, area: f64) -> Color {
        self.size_bin(area)
            .and_then(|i| self.colors.get(i).copied())
            .unwrap_or(self.infinity_color)
    }

    /// Index into `classes` of a coloured class, or `None` when the defect is
    /// unclassified or its class has no colour.
    pub fn class_bin(&self, class_id: Option<i64>) -> Option<usize> {
        let id = class_id?;
        self.classes
            .iter()
            .position(|c| c.id == id && c.color.is_some())
    }

    pub fn class_color(&self, class_id: Option<i64>) -> Color {
        self.class_bin(class_id)
            .and_then(|i| self.classes[i].color)
            .unwrap_or(self.infinity_color)
    }
}

/// Defect counts per size bin and per class.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BinStatistics {
    /// One entry per threshold, then the infinity bin.
    pub size_counts: Vec<usize>,
    /// One entry per class, then unclassified.
    pub class_counts: Vec<usize>,
}

impl BinStatistics {
    pub fn collect<'a>(binning: &BinningConfig, defects: impl IntoIterator<Item = &'a Defect>) -> Self {
        let mut stats = Self {
            size_counts: vec![0; binning.thresholds.len() + 1],
            class_counts: vec![0; binning.classes.len() + 1],
        };
        for defect in defects {
            let size = binning
                .size_bin(defect.area)
                .unwrap_or(binning.thresholds.len());
            stats.size_counts[size] += 1;
            let class = binning
                .class_bin(defect.class_id)
                .unwrap_or(binning.classes.len());
            stats.class_counts[class] += 1;
        }
        stats
    }

    pub fn infinity_count(&self) -> usize {
        self.size_counts.last().copied().unwrap_or(0)
    }

    pub fn unclassified_count(&self) -> usize {
        self.class_counts.last().copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.size_counts.iter().sum()
    }
}
