//! Descriptive statistics for the numeric and timestamp incident columns.

use crime_report_analytics_models::{ColumnKind, ColumnSummary};
use polars::prelude::*;

use crate::frame::{HOUR, IncidentTable, LAT, LONG, MONTH, OCCURRED_ON_DATE, OFFENSE_CODE, YEAR};

/// Columns summarized by [`describe`], in source order.
const DESCRIBED_COLUMNS: &[(&str, ColumnKind)] = &[
    (OFFENSE_CODE, ColumnKind::Number),
    (OCCURRED_ON_DATE, ColumnKind::Timestamp),
    (YEAR, ColumnKind::Number),
    (MONTH, ColumnKind::Number),
    (HOUR, ColumnKind::Number),
    (LAT, ColumnKind::Number),
    (LONG, ColumnKind::Number),
];

/// Summarizes every numeric and timestamp column of the incident table.
///
/// # Errors
///
/// * If a described column is missing from the frame or cannot be read as
///   numbers
pub fn describe(table: &IncidentTable<'_>) -> PolarsResult<Vec<ColumnSummary>> {
    DESCRIBED_COLUMNS
        .iter()
        .map(|&(name, kind)| summarize(name, kind, table.frame().column(name)?))
        .collect()
}

/// Computes count, mean, sample standard deviation, min, quartiles and max
/// of `column`, ignoring nulls. Quartiles interpolate linearly between
/// closest ranks. Timestamp columns get no standard deviation.
///
/// # Errors
///
/// * If `column` cannot be cast to `f64`
pub fn summarize(
    name: &'static str,
    kind: ColumnKind,
    column: &Column,
) -> PolarsResult<ColumnSummary> {
    let values = column.cast(&DataType::Float64)?;
    let values = values.f64()?;
    let count = values.len() - values.null_count();

    let std = match kind {
        ColumnKind::Number if count > 1 => values.std(1),
        _ => None,
    };

    Ok(ColumnSummary {
        name,
        kind,
        count: count as u64,
        mean: values.mean(),
        std,
        min: values.min(),
        q25: values.quantile(0.25, QuantileMethod::Linear)?,
        q50: values.quantile(0.5, QuantileMethod::Linear)?,
        q75: values.quantile(0.75, QuantileMethod::Linear)?,
        max: values.max(),
    })
}
