#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Turns analysis results into a readable report document and a
//! phase-by-month line chart.

pub mod chart;
pub mod report;
pub mod table;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// File name of the chart written next to the report.
pub const CHART_FILE_NAME: &str = "crime-count.svg";

/// Rows shown per table unless configured otherwise.
pub const DEFAULT_MAX_ROWS: usize = 20;

/// Errors from writing report output.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Writing the report file failed.
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    /// Drawing the chart failed.
    #[error("Failed to draw chart: {0}")]
    Chart(String),
}

/// Markup used for tables and headings.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TableFormat {
    /// Inline HTML `<table>` elements, the notebook-style default.
    #[default]
    Html,
    /// GitHub-flavored Markdown pipe tables.
    Markdown,
}
