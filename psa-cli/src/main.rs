mod cli;
mod config;
mod error;
mod plot;
mod report;

use crate::{cli::Cli, config::PlotConfig, error::Error, report::Report};

use clap::Parser;
use env_logger::{Builder, Env};
use log::{error, info, warn};
use psa::prelude::{fit, Series};

use std::path::Path;

fn load(path: &Path) -> Result<Series, Error> {
    let gzip = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    let series = if gzip {
        Series::from_gzip_file(path)
    } else {
        Series::from_file(path)
    };

    series.map_err(|error| Error::Parsing {
        path: path.to_path_buf(),
        error,
    })
}

fn main() -> Result<(), Error> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = PlotConfig::from(&cli);

    let mut series = Series::default();
    let mut loaded = 0;

    for path in cli.input_files() {
        match load(&path) {
            Ok(parsed) => {
                info!(
                    "loaded \"{}\": {} observations from {}",
                    path.display(),
                    parsed.len(),
                    parsed.sources().join(", ")
                );
                series.merge_mut(&parsed);
                loaded += 1;
            },
            Err(e) => error!("{}", e),
        }
    }

    if loaded == 0 {
        return Err(Error::NoInput);
    }

    let mut report = Report::new(&series, &config);

    let trend = fit(&series, cli.reference);
    if let Err(e) = &trend {
        warn!("combined series: {}", e);
    }

    report.push("combined", series.clone(), trend.clone());

    if cli.per_source {
        for (source, series) in series.split_by_source() {
            let trend = fit(&series, cli.reference);
            if let Err(e) = &trend {
                warn!("{}: {}", source, e);
            }
            report.push(&source, series, trend);
        }
    }

    let fitted = report
        .entries()
        .iter()
        .filter(|entry| entry.fit.is_ok())
        .count();
    info!("{}/{} series fitted", fitted, report.entries().len());

    let text = report.to_string();
    println!("{}", text);

    if let Some(path) = &cli.report {
        std::fs::write(path, &text)?;
        info!("generated \"{}\"", path.display());
    }

    if !cli.no_plot {
        plot::render(&series, trend.as_ref().ok(), &config)?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::load;
    use std::path::Path;

    #[test]
    fn compressed_input() {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("../data");
        let plain = load(&data.join("psa_perry.csv")).unwrap();
        let gzip = load(&data.join("psa_perry.csv.gz")).unwrap();
        assert_eq!(gzip, plain);
        assert_eq!(gzip.len(), 5);

        assert!(load(&data.join("psa_nobody.csv.gz")).is_err());
    }
}
