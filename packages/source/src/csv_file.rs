//! Delimited incident file reader.
//!
//! Reads the whole file into memory, decodes it from the configured
//! encoding with [`encoding_rs`], and parses every row into a
//! [`RawIncident`] keyed by the (trimmed) header names.

use std::borrow::Cow;
use std::sync::Arc;

use crime_report_source_models::{REQUIRED_COLUMNS, RawIncident, SourceConfig};
use encoding_rs::Encoding;

use crate::SourceError;
use crate::progress::ProgressCallback;

/// How many records to parse between progress updates.
const PROGRESS_INTERVAL: u64 = 10_000;

/// Reads and parses the incident file described by `config`.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read, the encoding label or
/// delimiter is invalid, or the CSV is malformed.
pub fn read_raw_incidents(
    config: &SourceConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<RawIncident>, SourceError> {
    let bytes = std::fs::read(&config.path).map_err(|source| SourceError::Read {
        path: config.path.clone(),
        source,
    })?;

    log::debug!("Read {} bytes from {}", bytes.len(), config.path.display());

    let text = decode(&bytes, &config.encoding)?;
    let delimiter = delimiter_byte(config.delimiter)?;

    parse_raw_incidents(&text, delimiter, progress)
}

/// Decodes `bytes` using the encoding named by a WHATWG `label`.
///
/// Byte sequences that are invalid in the encoding are replaced with
/// U+FFFD and logged rather than failing the run. A byte order mark, if
/// present, overrides the label.
///
/// # Errors
///
/// Returns [`SourceError::UnknownEncoding`] if the label is not recognized.
pub fn decode<'a>(bytes: &'a [u8], label: &str) -> Result<Cow<'a, str>, SourceError> {
    let encoding =
        Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| SourceError::UnknownEncoding {
            label: label.to_string(),
        })?;

    let (text, actual, had_errors) = encoding.decode(bytes);

    if had_errors {
        log::warn!(
            "Input contains byte sequences that are invalid in {}; replaced with U+FFFD",
            actual.name()
        );
    }
    log::debug!("Decoded input as {}", actual.name());

    Ok(text)
}

/// Converts a configured delimiter into the single byte the CSV reader
/// expects.
///
/// # Errors
///
/// Returns [`SourceError::UnsupportedDelimiter`] for non-ASCII delimiters.
pub fn delimiter_byte(delimiter: char) -> Result<u8, SourceError> {
    if delimiter.is_ascii() {
        u8::try_from(delimiter).map_err(|_| SourceError::UnsupportedDelimiter { delimiter })
    } else {
        Err(SourceError::UnsupportedDelimiter { delimiter })
    }
}

/// Parses decoded delimited text into raw incident rows.
///
/// Short rows are tolerated; their missing trailing fields read as `None`.
///
/// # Errors
///
/// Returns [`SourceError::MissingColumn`] if a required column is absent
/// from the header row, or [`SourceError::Csv`] if a row cannot be parsed.
pub fn parse_raw_incidents(
    text: &str,
    delimiter: u8,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<RawIncident>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: csv::StringRecord = reader.headers()?.iter().map(str::trim).collect();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(SourceError::MissingColumn {
                column: (*column).to_string(),
            });
        }
    }

    progress.set_total(text.len() as u64);

    let mut records = Vec::new();
    let mut record = csv::StringRecord::new();

    while reader.read_record(&mut record)? {
        records.push(record.deserialize::<RawIncident>(Some(&headers))?);

        if records.len() as u64 % PROGRESS_INTERVAL == 0 {
            progress.set_position(reader.position().byte());
        }
    }

    progress.finish(format!("Parsed {} records", records.len()));
    log::debug!("Parsed {} raw records", records.len());

    Ok(records)
}
