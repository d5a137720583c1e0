#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident file configuration and the raw row format of the Boston
//! incident report export.
//!
//! [`RawIncident`] mirrors the CSV columns one-to-one with every value kept
//! as text. Typing and normalization happen in the source crate's cleaning
//! step so that parse failures can be reported with the offending row.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Encoding label used when none is configured. The incident export is
/// Latin-1 encoded.
pub const DEFAULT_ENCODING: &str = "latin1";

/// Field delimiter used when none is configured.
pub const DEFAULT_DELIMITER: char = ',';

/// Columns that must be present in the header row for the analysis to run.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "INCIDENT_NUMBER",
    "OFFENSE_CODE",
    "OFFENSE_CODE_GROUP",
    "OFFENSE_DESCRIPTION",
    "DISTRICT",
    "OCCURRED_ON_DATE",
    "STREET",
];

/// Where and how to read the incident file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    /// Path to the delimited incident file.
    pub path: PathBuf,
    /// WHATWG encoding label of the file (e.g. `"latin1"`, `"utf-8"`).
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// Single-byte field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

const fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

impl SourceConfig {
    /// Creates a config for the given file with the default encoding and
    /// delimiter.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            encoding: default_encoding(),
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

/// One row of the incident export, exactly as it appears in the file.
///
/// Empty fields deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIncident {
    #[serde(rename = "INCIDENT_NUMBER")]
    pub incident_number: Option<String>,
    #[serde(rename = "OFFENSE_CODE")]
    pub offense_code: Option<String>,
    #[serde(rename = "OFFENSE_CODE_GROUP")]
    pub offense_code_group: Option<String>,
    #[serde(rename = "OFFENSE_DESCRIPTION")]
    pub offense_description: Option<String>,
    #[serde(rename = "DISTRICT")]
    pub district: Option<String>,
    #[serde(rename = "REPORTING_AREA")]
    pub reporting_area: Option<String>,
    #[serde(rename = "SHOOTING")]
    pub shooting: Option<String>,
    #[serde(rename = "OCCURRED_ON_DATE")]
    pub occurred_on_date: Option<String>,
    #[serde(rename = "YEAR")]
    pub year: Option<String>,
    #[serde(rename = "MONTH")]
    pub month: Option<String>,
    #[serde(rename = "DAY_OF_WEEK")]
    pub day_of_week: Option<String>,
    #[serde(rename = "HOUR")]
    pub hour: Option<String>,
    #[serde(rename = "UCR_PART")]
    pub ucr_part: Option<String>,
    #[serde(rename = "STREET")]
    pub street: Option<String>,
    #[serde(rename = "Lat")]
    pub lat: Option<String>,
    #[serde(rename = "Long")]
    pub long: Option<String>,
}
