//! Interactive prompts for running a report without memorizing flags.

use std::path::PathBuf;

use crime_report_analytics_models::Question;
use crime_report_cli_utils::MultiProgress;
use crime_report_render::TableFormat;
use dialoguer::{Confirm, Input, MultiSelect, Select};

use crate::config::ReportConfig;
use crate::pipeline;

/// Top-level actions in the interactive menu.
enum Action {
    RunReport,
    Describe,
}

impl Action {
    const ALL: &[Self] = &[Self::RunReport, Self::Describe];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::RunReport => "Run report",
            Self::Describe => "Describe dataset",
        }
    }
}

/// Output formats offered by the menu, in display order.
const FORMATS: &[TableFormat] = &[TableFormat::Html, TableFormat::Markdown];

/// Prompts for an action and its settings, then runs it. Values from the
/// environment (`base`) are offered as defaults.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected action fails.
pub fn run(base: ReportConfig, multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    let mut input = Input::<String>::new().with_prompt("Incident CSV file");
    if let Some(default) = &base.input {
        input = input.default(default.display().to_string());
    }
    let input = PathBuf::from(input.interact_text()?.trim());

    let format = select_format()?;

    match Action::ALL[idx] {
        Action::Describe => {
            let settings = base
                .merge(ReportConfig {
                    input: Some(input),
                    format: Some(format),
                    ..ReportConfig::default()
                })
                .resolve()?;
            pipeline::describe_dataset(&settings, multi)?;
        }
        Action::RunReport => {
            let questions = select_questions()?;
            if questions.is_empty() {
                println!("No questions selected.");
                return Ok(());
            }

            let output_dir: String = Input::new()
                .with_prompt("Output directory for the chart")
                .default(
                    base.output_dir
                        .as_ref()
                        .map_or_else(|| ".".to_string(), |d| d.display().to_string()),
                )
                .interact_text()?;

            let report: String = Input::new()
                .with_prompt("Report file (empty for stdout)")
                .allow_empty(true)
                .interact_text()?;

            let chart = Confirm::new()
                .with_prompt("Draw the phase/month chart?")
                .default(true)
                .interact()?;

            let settings = base
                .merge(ReportConfig {
                    input: Some(input),
                    output_dir: Some(PathBuf::from(output_dir.trim())),
                    report: Some(report.trim())
                        .filter(|r| !r.is_empty())
                        .map(PathBuf::from),
                    format: Some(format),
                    questions: Some(questions),
                    chart: Some(chart),
                    ..ReportConfig::default()
                })
                .resolve()?;
            pipeline::run(&settings, multi)?;
        }
    }

    Ok(())
}

fn select_format() -> Result<TableFormat, Box<dyn std::error::Error>> {
    let labels: Vec<&str> = FORMATS.iter().map(AsRef::as_ref).collect();

    let idx = Select::new()
        .with_prompt("Table format")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(FORMATS[idx])
}

fn select_questions() -> Result<Vec<Question>, Box<dyn std::error::Error>> {
    let labels: Vec<String> = Question::all()
        .iter()
        .map(|q| format!("{q}: {}", q.prompt()))
        .collect();
    let defaults = vec![true; labels.len()];

    let selected = MultiSelect::new()
        .with_prompt("Select questions (space=toggle, a=all, enter=confirm)")
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    Ok(selected.into_iter().map(|i| Question::all()[i]).collect())
}
