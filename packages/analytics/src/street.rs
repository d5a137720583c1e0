//! Per-street recency window.

use crime_report_crime_models::Incident;
use polars::prelude::*;

use crate::frame::{IncidentTable, OCCURRED_ON_DATE, STREET};

/// Returns at most `limit` of the most recent incidents on each street.
///
/// Rows are ordered by street descending, then occurrence time descending.
/// Incidents sharing a timestamp keep their input order. Incidents without
/// a street are excluded.
///
/// # Errors
///
/// * If the polars query fails
pub fn recent_incidents_per_street<'a>(
    table: &IncidentTable<'a>,
    limit: usize,
) -> PolarsResult<Vec<&'a Incident>> {
    let recent = table
        .lazy()
        .filter(col(STREET).is_not_null())
        .sort_by_exprs(
            [col(STREET), col(OCCURRED_ON_DATE)],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, true])
                .with_maintain_order(true),
        )
        .group_by_stable([col(STREET)])
        .head(Some(limit))
        .collect()?;

    table.rows(&recent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{incident, table};

    #[test]
    fn keeps_ten_most_recent_of_fifteen() {
        let incidents: Vec<Incident> = (1..=15)
            .map(|day| {
                incident(
                    "B2",
                    "theft",
                    "WASHINGTON ST",
                    &format!("2018-01-{day:02} 08:00:00"),
                )
            })
            .collect();

        let recent = recent_incidents_per_street(&table(&incidents), 10).unwrap();

        assert_eq!(recent.len(), 10);
        let days: Vec<u32> = recent
            .iter()
            .map(|i| chrono::Datelike::day(&i.occurred_on_date))
            .collect();
        assert_eq!(days, (6..=15).rev().collect::<Vec<_>>());
    }

    #[test]
    fn short_streets_yield_all_rows() {
        let incidents = vec![
            incident("B2", "theft", "A ST", "2018-01-01 08:00:00"),
            incident("B2", "theft", "A ST", "2018-01-02 08:00:00"),
            incident("C6", "theft", "B ST", "2018-01-03 08:00:00"),
        ];

        let recent = recent_incidents_per_street(&table(&incidents), 10).unwrap();

        let order: Vec<(&str, u32)> = recent
            .iter()
            .map(|i| {
                (
                    i.street.as_deref().unwrap_or_default(),
                    chrono::Datelike::day(&i.occurred_on_date),
                )
            })
            .collect();
        assert_eq!(order, vec![("B ST", 3), ("A ST", 2), ("A ST", 1)]);
    }

    #[test]
    fn timestamp_ties_keep_input_order() {
        let incidents = vec![
            incident("B2", "first", "A ST", "2018-01-01 08:00:00"),
            incident("B2", "second", "A ST", "2018-01-01 08:00:00"),
            incident("B2", "third", "A ST", "2018-01-01 08:00:00"),
        ];

        let recent = recent_incidents_per_street(&table(&incidents), 2).unwrap();

        let names: Vec<&str> = recent
            .iter()
            .map(|i| i.offense_description.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn incidents_without_street_are_excluded() {
        let incidents = vec![
            incident("B2", "theft", "", "2018-01-01 08:00:00"),
            incident("B2", "theft", "A ST", "2018-01-01 09:00:00"),
        ];

        let recent = recent_incidents_per_street(&table(&incidents), 10).unwrap();

        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].street.as_deref(), Some("A ST"));
    }

    #[test]
    fn zero_limit_keeps_nothing() {
        let incidents = vec![incident("B2", "theft", "A ST", "2018-01-01 08:00:00")];

        let recent = recent_incidents_per_street(&table(&incidents), 0).unwrap();

        assert!(recent.is_empty());
    }
}
