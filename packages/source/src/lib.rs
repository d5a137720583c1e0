#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident file loading, character decoding and cleaning.
//!
//! [`load_incidents`] reads the configured file, decodes it from its
//! declared encoding, parses the delimited rows into
//! [`RawIncident`](crime_report_source_models::RawIncident) values and runs
//! them through [`cleaning::clean_incidents`] to produce the base table every
//! analytical query reads from.

pub mod cleaning;
pub mod csv_file;
pub mod parsing;
pub mod progress;

use std::path::PathBuf;
use std::sync::Arc;

use crime_report_crime_models::Incident;
use crime_report_source_models::SourceConfig;

use crate::progress::ProgressCallback;

/// Errors that can occur while loading the incident table.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The input file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The configured encoding label is not a known WHATWG label.
    #[error("Unknown encoding label '{label}'")]
    UnknownEncoding {
        /// The label that was provided.
        label: String,
    },

    /// The configured delimiter is not a single ASCII character.
    #[error("Unsupported delimiter {delimiter:?}: expected a single ASCII character")]
    UnsupportedDelimiter {
        /// The delimiter that was provided.
        delimiter: char,
    },

    /// The header row lacks a column the analysis needs.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    /// A required field holds a value that cannot be parsed.
    #[error("Parse error in data row {row}: {field} has invalid value '{value}'")]
    Parse {
        /// 1-based data row number (the header row is not counted).
        row: u64,
        /// Column the value came from.
        field: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Loads and cleans the incident table described by `config`.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or decoded, is not
/// valid delimited text, lacks a required column, or any row holds an
/// unparseable required field.
pub fn load_incidents(
    config: &SourceConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<Incident>, SourceError> {
    let raw = csv_file::read_raw_incidents(config, progress)?;
    let incidents = cleaning::clean_incidents(raw)?;

    log::info!(
        "Loaded {} incidents from {}",
        incidents.len(),
        config.path.display()
    );

    Ok(incidents)
}
