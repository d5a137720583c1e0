#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the Boston crime incident report.
//!
//! Runs the five report questions over an incident export, either from
//! flags (`run`, `describe`) or through interactive prompts when no
//! subcommand is given.
//!
//! Uses `indicatif-log-bridge` (via [`crime_report_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod config;
mod interactive;
mod pipeline;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use crime_report_analytics_models::Question;
use crime_report_render::TableFormat;

use crate::config::ReportConfig;

#[derive(Parser)]
#[command(name = "crime_report", about = "Boston crime incident report")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// TOML file with default settings; flags take precedence
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer the report questions and render the report
    Run {
        #[command(flatten)]
        source: SourceArgs,
        /// Directory the chart is written to
        #[arg(long, env = "CRIME_REPORT_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,
        /// Write the report to this file instead of stdout
        #[arg(long)]
        report: Option<PathBuf>,
        /// Incidents kept per street for q5
        #[arg(long)]
        recent_limit: Option<usize>,
        /// Rows shown per table (0 shows all)
        #[arg(long)]
        max_rows: Option<usize>,
        /// Table markup: markdown or html
        #[arg(long)]
        format: Option<TableFormat>,
        /// Comma-separated subset of questions (e.g. "q1,q3")
        #[arg(long, value_delimiter = ',')]
        only: Option<Vec<Question>>,
        /// Skip drawing the phase/month chart
        #[arg(long)]
        no_chart: bool,
    },
    /// Print summary statistics of the numeric columns
    Describe {
        #[command(flatten)]
        source: SourceArgs,
        /// Table markup: markdown or html
        #[arg(long)]
        format: Option<TableFormat>,
    },
}

/// Where and how to read the incident file.
#[derive(Args)]
struct SourceArgs {
    /// Incident CSV file
    #[arg(long, env = "CRIME_REPORT_INPUT")]
    input: Option<PathBuf>,
    /// Character encoding of the file (default "latin1")
    #[arg(long)]
    encoding: Option<String>,
    /// Field delimiter (default ",")
    #[arg(long)]
    delimiter: Option<char>,
}

impl SourceArgs {
    fn into_config(self) -> ReportConfig {
        ReportConfig {
            input: self.input,
            encoding: self.encoding,
            delimiter: self.delimiter,
            ..ReportConfig::default()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crime_report_cli_utils::init_logger();
    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };

    let Some(command) = cli.command else {
        let env = ReportConfig {
            input: std::env::var_os("CRIME_REPORT_INPUT").map(PathBuf::from),
            output_dir: std::env::var_os("CRIME_REPORT_OUTPUT_DIR").map(PathBuf::from),
            ..ReportConfig::default()
        };
        return interactive::run(base.merge(env), &multi);
    };

    match command {
        Commands::Run {
            source,
            output_dir,
            report,
            recent_limit,
            max_rows,
            format,
            only,
            no_chart,
        } => {
            let flags = ReportConfig {
                output_dir,
                report,
                recent_limit,
                max_rows,
                format,
                questions: only,
                chart: no_chart.then_some(false),
                ..source.into_config()
            };
            let settings = base.merge(flags).resolve()?;
            pipeline::run(&settings, &multi)?;
        }
        Commands::Describe { source, format } => {
            let flags = ReportConfig {
                format,
                ..source.into_config()
            };
            let settings = base.merge(flags).resolve()?;
            pipeline::describe_dataset(&settings, &multi)?;
        }
    }

    Ok(())
}
