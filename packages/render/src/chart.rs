//! Line chart of the phase-by-month counts, one line per day phase.

use std::path::Path;

use crime_report_analytics_models::{MONTHS, PhaseMonthSummary};
use crime_report_crime_models::DayPhase;
use plotters::prelude::*;

use crate::RenderError;

const SIZE: (u32, u32) = (1024, 600);
const COLORS: [RGBColor; 4] = [BLUE, RED, GREEN, MAGENTA];

fn chart_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Chart(e.to_string())
}

/// Draws `summary` as an SVG line chart at `path`, months on the x axis.
///
/// # Errors
///
/// * If the SVG file cannot be written
pub fn draw_phase_month_chart(
    summary: &PhaseMonthSummary,
    title: &str,
    path: &Path,
) -> Result<(), RenderError> {
    let labels = PhaseMonthSummary::month_labels();
    let peak = summary.counts.iter().flatten().copied().max().unwrap_or(0);
    let y_max = peak + peak / 10 + 1;

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0_usize..MONTHS - 1, 0_u64..y_max)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .x_labels(MONTHS)
        .x_label_formatter(&|m| labels.get(*m).copied().unwrap_or_default().to_string())
        .x_desc("Month")
        .y_desc("Incidents")
        .draw()
        .map_err(chart_error)?;

    for (phase, color) in DayPhase::all().iter().zip(COLORS) {
        let style = color.stroke_width(2);
        chart
            .draw_series(LineSeries::new(
                summary.row(*phase).iter().copied().enumerate(),
                style,
            ))
            .map_err(chart_error)?
            .label(phase.to_string())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;

    Ok(())
}
