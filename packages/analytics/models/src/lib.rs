#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types of the crime report queries.
//!
//! Each query in `crime_report_analytics` returns one of these types. They
//! are derived from the cleaned incident table, rendered once and then
//! dropped; nothing here is persisted.

use chrono::{DateTime, NaiveDateTime};
use crime_report_crime_models::{DayPhase, Incident, month_abbr};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One of the fixed questions the report answers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Question {
    /// Auto Theft and Towed counts by day phase and month.
    Q1,
    /// Most frequent offense per district.
    Q2,
    /// Date of the next incident in the same district.
    Q3,
    /// Street with the most incidents per district.
    Q4,
    /// Most recent incidents per street.
    Q5,
}

impl Question {
    /// Returns all questions in report order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Q1, Self::Q2, Self::Q3, Self::Q4, Self::Q5]
    }

    /// Section title used in report output.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Q1 => "Crime Count",
            Self::Q2 => "Most Occurred Offense In A District",
            Self::Q3 => "Previous Incident Date In Each District",
            Self::Q4 => "Streets With Highest Incidents In Each District",
            Self::Q5 => "Recent Incidents For Each Street",
        }
    }

    /// The question as posed, for the report preamble and interactive
    /// prompts.
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Q1 => {
                "Count of Auto Theft and Towed by phase of day (as index) vs month (as column)"
            }
            Self::Q2 => "Offense per district which has maximum occurrence in respective district",
            Self::Q3 => "Date of last incident happened in respective district",
            Self::Q4 => "Street having maximum number of incidents for every district",
            Self::Q5 => "Subset of data with only the most recent incidents for each street",
        }
    }
}

/// Number of month columns in a [`PhaseMonthSummary`].
pub const MONTHS: usize = 12;

/// Incident counts cross-tabulated by day phase (rows) and month (columns).
///
/// The matrix is dense: every phase/month combination is present and
/// combinations with no incidents hold zero. Rows are indexed by
/// [`DayPhase::display_order`], columns by month number minus one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseMonthSummary {
    /// Counts indexed `[phase.display_order()][month - 1]`.
    pub counts: [[u64; MONTHS]; 4],
}

impl PhaseMonthSummary {
    /// Adds one incident to the cell for `phase` and the 1-based `month`.
    /// Months outside 1-12 are ignored.
    pub fn record(&mut self, phase: DayPhase, month: i32) {
        self.add(phase, month, 1);
    }

    /// Adds `count` incidents to the cell for `phase` and the 1-based
    /// `month`. Returns `false`, leaving the matrix untouched, when the
    /// month is outside 1-12.
    pub fn add(&mut self, phase: DayPhase, month: i32, count: u64) -> bool {
        month_index(month).is_some_and(|col| {
            self.counts[phase.display_order()][col] += count;
            true
        })
    }

    /// Returns the count for `phase` in the 1-based `month`.
    #[must_use]
    pub fn count(&self, phase: DayPhase, month: i32) -> u64 {
        month_index(month).map_or(0, |col| self.counts[phase.display_order()][col])
    }

    /// Returns the twelve month counts for `phase`.
    #[must_use]
    pub const fn row(&self, phase: DayPhase) -> &[u64; MONTHS] {
        &self.counts[phase.display_order()]
    }

    /// Returns the total of every cell.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Returns the month column labels, `Jan` through `Dec`.
    #[must_use]
    pub fn month_labels() -> Vec<&'static str> {
        (1..=12).filter_map(month_abbr).collect()
    }
}

fn month_index(month: i32) -> Option<usize> {
    usize::try_from(month)
        .ok()
        .filter(|m| (1..=MONTHS).contains(m))
        .map(|m| m - 1)
}

/// The most frequent offense within one district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffenseCount {
    /// District the offense was counted in.
    pub district: String,
    /// Numeric offense code.
    pub offense_code: i32,
    /// Offense description.
    pub offense_description: String,
    /// Number of incidents with this offense in the district.
    pub count: u64,
}

/// The street with the most incidents within one district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetCount {
    /// District the street was counted in.
    pub district: String,
    /// Street name.
    pub street: String,
    /// Number of incidents on this street in the district.
    pub count: u64,
}

/// An incident paired with the occurrence time of the next incident in the
/// same district.
///
/// The column is named `last_incident_date` in report output, but holds the
/// chronologically *following* incident's time. The final incident of each
/// district has `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastIncidentRow<'a> {
    /// The incident this row augments.
    pub incident: &'a Incident,
    /// Occurrence time of the next incident in the district.
    pub last_incident_date: Option<NaiveDateTime>,
}

/// How the statistics of a [`ColumnSummary`] are to be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Plain numbers.
    #[default]
    Number,
    /// Epoch milliseconds; see [`timestamp_from_millis`].
    Timestamp,
}

/// Converts a (possibly fractional) epoch-millisecond statistic back to a
/// timestamp.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn timestamp_from_millis(millis: f64) -> Option<NaiveDateTime> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis.round() as i64).map(|t| t.naive_utc())
}

/// Descriptive statistics for one column.
///
/// Missing values are excluded. Every statistic is `None` for a column with
/// no values; `std` is also `None` for a column with a single value and for
/// timestamp columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSummary {
    /// Column name as it appears in the source file.
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Number of non-missing values.
    pub count: u64,
    /// Arithmetic mean.
    pub mean: Option<f64>,
    /// Sample standard deviation.
    pub std: Option<f64>,
    /// Minimum.
    pub min: Option<f64>,
    /// First quartile.
    pub q25: Option<f64>,
    /// Median.
    pub q50: Option<f64>,
    /// Third quartile.
    pub q75: Option<f64>,
    /// Maximum.
    pub max: Option<f64>,
}
