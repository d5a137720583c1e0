//! Report pipeline: load, answer, chart, render.
//!
//! Uses `indicatif` progress bars for loading and answering, routed through
//! the shared [`MultiProgress`] so log lines do not interleave with them.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crime_report_analytics::{Analysis, IncidentTable, describe};
use crime_report_cli_utils::{IndicatifProgress, MultiProgress};
use crime_report_crime_models::Incident;
use crime_report_render::CHART_FILE_NAME;
use crime_report_render::chart::draw_phase_month_chart;
use crime_report_render::report::{
    ReportOptions, describe_table, phase_month_caption, render_report, write_report,
};
use crime_report_source::cleaning::CLEANING_STEPS;
use crime_report_source::load_incidents;

use crate::config::RunSettings;

fn load(
    settings: &RunSettings,
    multi: &MultiProgress,
) -> Result<Vec<Incident>, Box<dyn std::error::Error>> {
    let start = Instant::now();
    log::info!("Loading incidents from {}", settings.source.path.display());

    let progress = IndicatifProgress::bytes_bar(multi, "Reading incidents");
    let incidents = load_incidents(&settings.source, &progress)?;

    log::info!(
        "Loaded {} incidents in {:.1}s",
        incidents.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(incidents)
}

/// Runs every configured question and writes the report, plus the chart
/// when the phase/month question is answered.
///
/// # Errors
///
/// Returns an error if loading fails or the report or chart cannot be
/// written.
pub fn run(
    settings: &RunSettings,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let incidents = load(settings, multi)?;
    let table = IncidentTable::new(&incidents)?;

    let mut analysis = Analysis {
        summary: describe::describe(&table)?,
        ..Analysis::default()
    };

    let steps = IndicatifProgress::steps_bar(
        multi,
        "Answering questions",
        settings.questions.len() as u64,
    );
    for question in &settings.questions {
        analysis.answer(&table, &settings.analysis, *question)?;
        steps.inc(1);
    }
    steps.finish(format!("Answered {} questions", settings.questions.len()));

    let caption = phase_month_caption(&settings.analysis.offense_groups);
    let link = match &analysis.phase_month {
        Some(summary) if settings.chart => {
            std::fs::create_dir_all(&settings.output_dir)?;
            let path = settings.output_dir.join(CHART_FILE_NAME);
            draw_phase_month_chart(summary, &caption, &path)?;
            log::info!("Wrote chart to {}", path.display());
            Some(chart_link(settings.report.as_deref(), &path))
        }
        _ => None,
    };

    let options = ReportOptions {
        format: settings.format,
        max_rows: settings.max_rows,
        chart_link: link,
        offense_groups: settings.analysis.offense_groups.clone(),
        cleaning_steps: CLEANING_STEPS.iter().map(ToString::to_string).collect(),
    };
    let document = render_report(&analysis, &settings.questions, &options);

    match &settings.report {
        Some(path) => write_report(&document, path)?,
        None => print!("{document}"),
    }

    Ok(())
}

/// Prints the column summary and the cleaning steps.
///
/// # Errors
///
/// Returns an error if loading fails.
pub fn describe_dataset(
    settings: &RunSettings,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let incidents = load(settings, multi)?;
    let summary = describe::describe(&IncidentTable::new(&incidents)?)?;

    print!("{}", describe_table(&summary).render(settings.format, None));
    println!();
    for step in CLEANING_STEPS {
        println!("- {step}");
    }

    Ok(())
}

/// Link to the chart as seen from the report. Relative to the report's
/// directory when the chart lies below it.
fn chart_link(report: Option<&Path>, chart: &Path) -> String {
    report
        .and_then(Path::parent)
        .and_then(|dir| chart.strip_prefix(dir).ok())
        .map_or_else(|| chart.to_path_buf(), PathBuf::from)
        .display()
        .to_string()
}
