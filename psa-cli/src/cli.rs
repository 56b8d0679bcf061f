use clap::Parser;
use log::warn;
use psa::prelude::Date;
use walkdir::WalkDir;

use std::path::{Path, PathBuf};

/// File extensions we pick up when walking a directory
const EXTENSIONS: [&str; 3] = ["csv", "txt", "gz"];

#[derive(Debug, Parser)]
#[command(name = "psa", version)]
#[command(about = "Plots prostate-specific antigen (PSA) results and projects their trend")]
pub struct Cli {
    /// Input files or directories.
    /// Directories are walked for .csv, .txt and .gz files.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
    /// Target value whose crossing date is projected,
    /// also the upper bound of the fixed range plot.
    #[arg(short, long, default_value_t = 3.0)]
    pub threshold: f64,
    /// Lower bound of the fixed range plot.
    #[arg(long, default_value_t = -0.05, allow_negative_numbers = true)]
    pub y_min: f64,
    /// Time origin of the fit (YYYY-MM-DD). Defaults to the earliest result.
    #[arg(long)]
    pub reference: Option<Date>,
    /// Also fit each source (physician) separately.
    #[arg(long)]
    pub per_source: bool,
    /// Output directory.
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
    /// Plot file name prefix.
    #[arg(long, default_value = "psa")]
    pub stem: String,
    /// Plot title.
    #[arg(long)]
    pub title: Option<String>,
    /// Author, shown in the subtitle next to the latest result date.
    #[arg(long)]
    pub author: Option<String>,
    /// X axis label.
    #[arg(long)]
    pub x_label: Option<String>,
    /// Y axis label.
    #[arg(long)]
    pub y_label: Option<String>,
    /// Unit of the results, used in the report and the threshold legend.
    #[arg(long, default_value = "ng/mL")]
    pub unit: String,
    /// Also write the report to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Do not render any plot.
    #[arg(long)]
    pub no_plot: bool,
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl Cli {
    /// Lists all input files: files are kept as is,
    /// directories are walked recursively.
    pub fn input_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::with_capacity(self.inputs.len());

        for input in self.inputs.iter() {
            if input.is_dir() {
                for entry in WalkDir::new(input).sort_by_file_name() {
                    match entry {
                        Ok(entry) => {
                            let path = entry.path();
                            if entry.file_type().is_file() && is_supported(path) {
                                files.push(path.to_path_buf());
                            }
                        },
                        Err(e) => warn!("{}: {}", input.display(), e),
                    }
                }
            } else {
                files.push(input.clone());
            }
        }

        files
    }
}
