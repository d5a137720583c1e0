//! Day phase by month cross-tabulation.

use crime_report_analytics_models::PhaseMonthSummary;
use crime_report_crime_models::DayPhase;
use polars::prelude::*;

use crate::frame::{COUNT, HOUR, IncidentTable, MONTH, OFFENSE_CODE_GROUP};

/// Counts incidents whose offense group is one of `offense_groups`, by day
/// phase and month.
///
/// Incidents with an hour outside `0..24` or a month outside `1..=12`
/// belong to no cell and are skipped.
///
/// # Errors
///
/// * If the polars query fails
pub fn phase_month_counts<S: AsRef<str>>(
    table: &IncidentTable<'_>,
    offense_groups: &[S],
) -> PolarsResult<PhaseMonthSummary> {
    let targeted = offense_groups.iter().fold(lit(false), |any, group| {
        any.or(col(OFFENSE_CODE_GROUP).eq(lit(group.as_ref())))
    });

    let cells = table
        .lazy()
        .filter(targeted)
        .group_by_stable([col(HOUR), col(MONTH)])
        .agg([len().cast(DataType::UInt64).alias(COUNT)])
        .collect()?;

    let hours = cells.column(HOUR)?.i32()?;
    let months = cells.column(MONTH)?.i32()?;
    let counts = cells.column(COUNT)?.u64()?;

    let mut summary = PhaseMonthSummary::default();
    let mut matched = 0_u64;
    let mut skipped = 0_u64;

    for ((hour, month), count) in hours.into_iter().zip(months).zip(counts) {
        let (Some(hour), Some(month), Some(count)) = (hour, month, count) else {
            continue;
        };
        matched += count;

        let recorded =
            DayPhase::from_hour(hour).is_some_and(|phase| summary.add(phase, month, count));
        if !recorded {
            skipped += count;
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} of {matched} incidents with an out-of-range hour or month");
    }
    log::debug!("Cross-tabulated {} incidents", summary.total());

    Ok(summary)
}
