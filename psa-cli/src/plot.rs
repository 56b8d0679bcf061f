//! PSA plots
use crate::config::PlotConfig;
use itertools::Itertools;
use log::info;
use plotly::{
    color::Rgb,
    common::{DashType, Line, Marker, Mode, Title},
    layout::{Axis, Layout, Legend},
    Plot, Scatter,
};
use psa::prelude::{FittedTrend, Series};

use std::path::Path;

/// Y axis range of a plot
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Range {
    /// Scaled on the data
    Auto,
    /// Fixed between bounds
    Fixed(f64, f64),
}

fn rgb(color: (u8, u8, u8)) -> Rgb {
    let (r, g, b) = color;
    Rgb::new(r, g, b)
}

/// Plot title, followed by the author and latest date subtitle.
pub fn title(series: &Series, config: &PlotConfig) -> String {
    let latest = series
        .last_date()
        .map(|date| date.to_string())
        .unwrap_or_default();

    let subtitle = match &config.author {
        Some(author) => format!("{} {}", author, latest),
        None => latest,
    };

    if subtitle.is_empty() {
        config.title.clone()
    } else {
        format!("{}<br><sub>{}</sub>", config.title, subtitle)
    }
}

/// Builds the scatter [Plot] of all sources of this [Series],
/// with the possible trend overlay. The threshold line is only
/// drawn on [Range::Fixed] plots.
pub fn build_plot(
    series: &Series,
    trend: Option<&FittedTrend>,
    range: Range,
    config: &PlotConfig,
) -> Plot {
    let mut plot = Plot::new();

    for (index, (source, series)) in series.split_by_source().into_iter().enumerate() {
        let (x, y): (Vec<String>, Vec<f64>) = series
            .valid()
            .map(|(date, value)| (date.to_string(), value))
            .unzip();

        let trace = Scatter::new(x, y)
            .mode(Mode::Markers)
            .name(&source)
            .marker(Marker::new().size(8).color(rgb(config.color(index))));

        plot.add_trace(trace);
    }

    if let Some(trend) = trend {
        let x = trend.dates.iter().map(|date| date.to_string()).collect::<Vec<_>>();

        let trace = Scatter::new(x, trend.predicted.clone())
            .mode(Mode::Lines)
            .name("trend")
            .line(Line::new().width(1.5).color(rgb(config.trend_color)));

        plot.add_trace(trace);
    }

    let mut y_axis = Axis::new().title(Title::with_text(&config.y_label));

    if let Range::Fixed(min, max) = range {
        y_axis = y_axis.range(vec![min, max]);

        let dates = series.iter().map(|obs| obs.date).minmax().into_option();

        if let Some((first, last)) = dates {
            let trace = Scatter::new(
                vec![first.to_string(), last.to_string()],
                vec![config.threshold, config.threshold],
            )
            .mode(Mode::Lines)
            .name(&format!("{} {}", config.threshold, config.unit))
            .line(
                Line::new()
                    .dash(DashType::Dash)
                    .color(rgb(config.threshold_color)),
            );

            plot.add_trace(trace);
        }
    }

    let layout = Layout::new()
        .title(Title::with_text(&title(series, config)))
        .x_axis(Axis::new().title(Title::with_text(&config.x_label)))
        .y_axis(y_axis)
        .legend(Legend::new().x(0.01).y(0.99));

    plot.set_layout(layout);
    plot
}

/// Renders the [Plot] as a standalone HTML file.
pub fn write_plot(plot: &Plot, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, plot.to_html())?;
    info!("generated \"{}\"", path.display());
    Ok(())
}

/// Renders both the automatic range and the fixed range plots.
pub fn render(
    series: &Series,
    trend: Option<&FittedTrend>,
    config: &PlotConfig,
) -> std::io::Result<()> {
    std::fs::create_dir_all(&config.output_dir)?;

    let plot = build_plot(series, trend, Range::Auto, config);
    write_plot(&plot, &config.full_range_path())?;

    let plot = build_plot(
        series,
        trend,
        Range::Fixed(config.y_min, config.threshold),
        config,
    );
    write_plot(&plot, &config.fixed_range_path())?;

    Ok(())
}
