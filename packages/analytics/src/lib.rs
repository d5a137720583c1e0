#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analytical queries over the cleaned incident table.
//!
//! The table is loaded once into a polars frame ([`IncidentTable`]); every
//! query builds its own lazy plan over it and returns a freshly derived
//! result, so queries can run in any order. [`Analysis`] collects the
//! results of whichever [`Question`]s a run asks for.

pub mod describe;
pub mod district;
pub mod frame;
pub mod phase;
pub mod street;

pub use frame::IncidentTable;

use crime_report_analytics_models::{
    ColumnSummary, LastIncidentRow, OffenseCount, PhaseMonthSummary, Question, StreetCount,
};
use crime_report_crime_models::Incident;
use polars::prelude::PolarsResult;

/// Offense groups counted by the phase/month cross-tabulation by default.
pub const DEFAULT_OFFENSE_GROUPS: &[&str] = &["Auto Theft", "Towed"];

/// Incidents kept per street by the recency query by default.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Tunable inputs of the queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Offense groups counted by [`Question::Q1`].
    pub offense_groups: Vec<String>,
    /// Incidents kept per street by [`Question::Q5`].
    pub recent_limit: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            offense_groups: DEFAULT_OFFENSE_GROUPS
                .iter()
                .map(ToString::to_string)
                .collect(),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

/// Results of one run. Questions that were not asked stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis<'a> {
    /// Numeric column summary of the whole table.
    pub summary: Vec<ColumnSummary>,
    /// [`Question::Q1`] result.
    pub phase_month: Option<PhaseMonthSummary>,
    /// [`Question::Q2`] result.
    pub top_offenses: Option<Vec<OffenseCount>>,
    /// [`Question::Q3`] result.
    pub last_incidents: Option<Vec<LastIncidentRow<'a>>>,
    /// [`Question::Q4`] result.
    pub top_streets: Option<Vec<StreetCount>>,
    /// [`Question::Q5`] result.
    pub recent_incidents: Option<Vec<&'a Incident>>,
}

impl<'a> Analysis<'a> {
    /// Summarizes `incidents` and answers each of `questions`.
    ///
    /// # Errors
    ///
    /// * If building the frame or any query fails
    pub fn run(
        incidents: &'a [Incident],
        options: &AnalysisOptions,
        questions: &[Question],
    ) -> PolarsResult<Self> {
        let table = IncidentTable::new(incidents)?;
        let mut analysis = Self {
            summary: describe::describe(&table)?,
            ..Self::default()
        };
        for question in questions {
            analysis.answer(&table, options, *question)?;
        }
        Ok(analysis)
    }

    /// Answers a single question, replacing any earlier answer to it.
    ///
    /// # Errors
    ///
    /// * If the question's query fails
    pub fn answer(
        &mut self,
        table: &IncidentTable<'a>,
        options: &AnalysisOptions,
        question: Question,
    ) -> PolarsResult<()> {
        log::info!("Answering {question}: {}", question.title());

        match question {
            Question::Q1 => {
                self.phase_month = Some(phase::phase_month_counts(
                    table,
                    &options.offense_groups,
                )?);
            }
            Question::Q2 => {
                self.top_offenses = Some(district::top_offense_per_district(table)?);
            }
            Question::Q3 => {
                self.last_incidents = Some(district::last_incident_dates(table)?);
            }
            Question::Q4 => {
                self.top_streets = Some(district::top_street_per_district(table)?);
            }
            Question::Q5 => {
                self.recent_incidents = Some(street::recent_incidents_per_street(
                    table,
                    options.recent_limit,
                )?);
            }
        }

        Ok(())
    }
}
