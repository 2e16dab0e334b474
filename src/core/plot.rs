use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::core::error::{BallisticsError, BallisticsResult};
use crate::core::window::window_for_points;

pub const DEFAULT_PLOT_SIZE: (u32, u32) = (1200, 700);

const SERIES_COLORS: [RGBColor; 5] = [
    RGBColor(54, 123, 245),
    RGBColor(242, 159, 5),
    RGBColor(76, 175, 80),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
];

pub struct PlotSeries<'a> {
    pub label: String,
    pub points: &'a [(f64, f64)],
    pub dashed: bool,
}

impl<'a> PlotSeries<'a> {
    pub fn solid(label: impl Into<String>, points: &'a [(f64, f64)]) -> Self {
        Self {
            label: label.into(),
            points,
            dashed: false,
        }
    }

    pub fn reference(label: impl Into<String>, points: &'a [(f64, f64)]) -> Self {
        Self {
            label: label.into(),
            points,
            dashed: true,
        }
    }
}

fn plot_error(err: impl std::fmt::Display) -> BallisticsError {
    BallisticsError::Plot(err.to_string())
}

/// `trajectory-YYYYmmdd-HHMMSS.png` inside `dir`.
pub fn timestamped_path<Tz: TimeZone>(dir: &Path, now: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    dir.join(format!("trajectory-{}.png", now.format("%Y%m%d-%H%M%S")))
}

/// Draws onto a caller-owned area, so several charts can share one image.
pub fn draw_trajectories<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    series: &[PlotSeries<'_>],
) -> BallisticsResult<()> {
    let window = window_for_points(series.iter().flat_map(|s| s.points.iter()));

    area.fill(&WHITE).map_err(plot_error)?;
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 24))
        .margin(16)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(window.x_range(), window.y_range())
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("Range (m)")
        .y_desc("Altitude (m)")
        .light_line_style(RGBColor(227, 231, 236))
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new(
            [(0.0, 0.0), (window.x_max, 0.0)],
            BLACK.mix(0.5).stroke_width(1),
        ))
        .map_err(plot_error)?;

    for (idx, s) in series.iter().enumerate() {
        let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
        let anno = if s.dashed {
            chart
                .draw_series(DashedLineSeries::new(
                    s.points.iter().copied(),
                    8,
                    6,
                    color.stroke_width(2),
                ))
                .map_err(plot_error)?
        } else {
            chart
                .draw_series(LineSeries::new(
                    s.points.iter().copied(),
                    color.stroke_width(2),
                ))
                .map_err(plot_error)?
        };
        anno.label(s.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(plot_error)?;

    area.present().map_err(plot_error)?;
    Ok(())
}

pub fn render_png(
    path: &Path,
    title: &str,
    series: &[PlotSeries<'_>],
    size: (u32, u32),
) -> BallisticsResult<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    draw_trajectories(&root, title, series)?;
    tracing::info!(path = %path.display(), series = series.len(), "wrote trajectory plot");
    Ok(())
}
