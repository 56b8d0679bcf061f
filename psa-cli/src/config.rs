use crate::cli::Cli;
use std::path::PathBuf;

/// Colour-blind friendly "Paired" qualitative palette
pub const PAIRED: [(u8, u8, u8); 12] = [
    (166, 206, 227),
    (31, 120, 180),
    (178, 223, 138),
    (51, 160, 44),
    (251, 154, 153),
    (227, 26, 28),
    (253, 191, 111),
    (255, 127, 0),
    (202, 178, 214),
    (106, 61, 154),
    (255, 255, 153),
    (177, 89, 40),
];

/// Every label, color, range and output setting of the plots and the report.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    /// Plot title
    pub title: String,
    /// Author, shown in the subtitle
    pub author: Option<String>,
    /// X axis label
    pub x_label: String,
    /// Y axis label
    pub y_label: String,
    /// Unit of the values, for the report and the threshold legend
    pub unit: String,
    /// Target value: crossing date projection and fixed range upper bound
    pub threshold: f64,
    /// Fixed range lower bound
    pub y_min: f64,
    /// One color per source, cycled
    pub palette: Vec<(u8, u8, u8)>,
    /// Trend line color
    pub trend_color: (u8, u8, u8),
    /// Threshold line color
    pub threshold_color: (u8, u8, u8),
    /// Output directory
    pub output_dir: PathBuf,
    /// Plot file name prefix
    pub stem: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            title: "Prostate-specific Antigen (PSA) Test".to_string(),
            author: None,
            x_label: "Date".to_string(),
            y_label: "PSA (ng/mL)".to_string(),
            unit: "ng/mL".to_string(),
            threshold: 3.0,
            y_min: -0.05,
            palette: PAIRED.to_vec(),
            trend_color: (128, 128, 128),
            threshold_color: (227, 26, 28),
            output_dir: PathBuf::from("."),
            stem: "psa".to_string(),
        }
    }
}

impl PlotConfig {
    /// Color of the i-th source
    pub fn color(&self, index: usize) -> (u8, u8, u8) {
        if self.palette.is_empty() {
            self.trend_color
        } else {
            self.palette[index % self.palette.len()]
        }
    }

    /// Output path of the automatic range plot
    pub fn full_range_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.html", self.stem))
    }

    /// Output path of the fixed range plot
    pub fn fixed_range_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_max.html", self.stem))
    }
}

impl From<&Cli> for PlotConfig {
    fn from(cli: &Cli) -> Self {
        let default = Self::default();
        Self {
            title: cli.title.clone().unwrap_or(default.title),
            author: cli.author.clone(),
            x_label: cli.x_label.clone().unwrap_or(default.x_label),
            y_label: cli.y_label.clone().unwrap_or(default.y_label),
            unit: cli.unit.clone(),
            threshold: cli.threshold,
            y_min: cli.y_min,
            output_dir: cli.output_dir.clone(),
            stem: cli.stem.clone(),
            ..default
        }
    }
}
