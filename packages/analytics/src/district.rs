//! Per-district queries: dominant offense, hotspot street and the
//! next-incident timeline.

use crime_report_analytics_models::{LastIncidentRow, OffenseCount, StreetCount};
use polars::prelude::*;

use crate::frame::{
    COUNT, DISTRICT, IncidentTable, OCCURRED_ON_DATE, OFFENSE_CODE, OFFENSE_DESCRIPTION, ROW,
    STREET,
};

const NEXT_ROW: &str = "NEXT_ROW";

/// Counts rows per `(DISTRICT, keys...)` and keeps the largest group of each
/// district.
///
/// Groups are counted in first-encountered order and then stably sorted by
/// district descending, count descending, so a tie goes to the group seen
/// first. The plan yields one row per district, district descending.
fn top_per_district(frame: LazyFrame, keys: &[&str]) -> LazyFrame {
    let by: Vec<Expr> = std::iter::once(DISTRICT)
        .chain(keys.iter().copied())
        .map(col)
        .collect();
    let firsts: Vec<Expr> = keys
        .iter()
        .copied()
        .chain([COUNT])
        .map(|name| col(name).first())
        .collect();

    frame
        .group_by_stable(by)
        .agg([len().cast(DataType::UInt64).alias(COUNT)])
        .sort_by_exprs(
            [col(DISTRICT), col(COUNT)],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, true])
                .with_maintain_order(true),
        )
        .group_by_stable([col(DISTRICT)])
        .agg(firsts)
}

/// Returns the most frequent `(offense_code, offense_description)` of each
/// district, one row per district, ordered by district descending.
///
/// Incidents without a description are not counted.
///
/// # Errors
///
/// * If the polars query fails
pub fn top_offense_per_district(table: &IncidentTable<'_>) -> PolarsResult<Vec<OffenseCount>> {
    let top = top_per_district(
        table.lazy().filter(col(OFFENSE_DESCRIPTION).is_not_null()),
        &[OFFENSE_CODE, OFFENSE_DESCRIPTION],
    )
    .collect()?;

    let districts = top.column(DISTRICT)?.str()?;
    let codes = top.column(OFFENSE_CODE)?.i32()?;
    let descriptions = top.column(OFFENSE_DESCRIPTION)?.str()?;
    let counts = top.column(COUNT)?.u64()?;

    Ok(districts
        .into_iter()
        .zip(codes)
        .zip(descriptions)
        .zip(counts)
        .filter_map(|(((district, code), description), count)| {
            Some(OffenseCount {
                district: district?.to_string(),
                offense_code: code?,
                offense_description: description?.to_string(),
                count: count?,
            })
        })
        .collect())
}

/// Returns the street with the most incidents in each district, one row per
/// district, ordered by district descending.
///
/// Incidents without a street are not counted, so a district whose
/// incidents all lack a street has no row.
///
/// # Errors
///
/// * If the polars query fails
pub fn top_street_per_district(table: &IncidentTable<'_>) -> PolarsResult<Vec<StreetCount>> {
    let top = top_per_district(
        table.lazy().filter(col(STREET).is_not_null()),
        &[STREET],
    )
    .collect()?;

    let districts = top.column(DISTRICT)?.str()?;
    let streets = top.column(STREET)?.str()?;
    let counts = top.column(COUNT)?.u64()?;

    Ok(districts
        .into_iter()
        .zip(streets)
        .zip(counts)
        .filter_map(|((district, street), count)| {
            Some(StreetCount {
                district: district?.to_string(),
                street: street?.to_string(),
                count: count?,
            })
        })
        .collect())
}

/// Pairs every incident with the occurrence time of the next incident in
/// its district.
///
/// The table is stably sorted by district and occurrence time, and each row
/// takes the row index of its successor within the district
/// (`shift(-1)` over `DISTRICT`), so the column looks *forward*. The last
/// incident of each district gets `None`. The output has the same length
/// and order as the table.
///
/// # Errors
///
/// * If the polars query fails
pub fn last_incident_dates<'a>(
    table: &IncidentTable<'a>,
) -> PolarsResult<Vec<LastIncidentRow<'a>>> {
    let shifted = table
        .lazy()
        .sort_by_exprs(
            [col(DISTRICT), col(OCCURRED_ON_DATE)],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .with_column(col(ROW).shift(lit(-1)).over([col(DISTRICT)]).alias(NEXT_ROW))
        .sort_by_exprs([col(ROW)], SortMultipleOptions::default())
        .select([col(NEXT_ROW)])
        .collect()?;

    let next_rows = shifted.column(NEXT_ROW)?.idx()?;

    table
        .incidents()
        .iter()
        .zip(next_rows)
        .map(|(incident, next)| {
            let following = next.map(|row| table.incident(row)).transpose()?;
            Ok(LastIncidentRow {
                incident,
                last_incident_date: following.map(|f| f.occurred_on_date),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{incident, table};

    #[test]
    fn top_offense_scenario() {
        let incidents = vec![
            incident("A", "theft", "X ST", "2018-01-01 10:00:00"),
            incident("A", "towed", "X ST", "2018-01-02 10:00:00"),
            incident("A", "theft", "Y ST", "2018-01-03 10:00:00"),
        ];

        let result = top_offense_per_district(&table(&incidents)).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].district, "A");
        assert_eq!(result[0].offense_description, "theft");
        assert_eq!(result[0].count, 2);
    }

    #[test]
    fn top_offense_has_one_maximal_row_per_district() {
        let incidents = vec![
            incident("B2", "towed", "A ST", "2018-01-01 10:00:00"),
            incident("C11", "theft", "A ST", "2018-01-01 11:00:00"),
            incident("B2", "theft", "A ST", "2018-01-01 12:00:00"),
            incident("B2", "towed", "A ST", "2018-01-01 13:00:00"),
            incident("not available", "fraud", "A ST", "2018-01-01 14:00:00"),
        ];

        let result = top_offense_per_district(&table(&incidents)).unwrap();

        let districts: Vec<&str> = result.iter().map(|r| r.district.as_str()).collect();
        assert_eq!(districts, vec!["not available", "C11", "B2"]);
        let b2 = &result[2];
        assert_eq!((b2.offense_description.as_str(), b2.count), ("towed", 2));
    }

    #[test]
    fn top_offense_tie_keeps_first_encountered() {
        let incidents = vec![
            incident("A", "vandalism", "X ST", "2018-01-01 10:00:00"),
            incident("A", "theft", "X ST", "2018-01-02 10:00:00"),
        ];

        let result = top_offense_per_district(&table(&incidents)).unwrap();

        assert_eq!(result[0].offense_description, "vandalism");
    }

    #[test]
    fn top_street_per_district_skips_missing_streets() {
        let incidents = vec![
            incident("D4", "theft", "", "2018-01-01 10:00:00"),
            incident("D4", "theft", "", "2018-01-01 10:30:00"),
            incident("D4", "theft", "BOYLSTON ST", "2018-01-01 11:00:00"),
            incident("E5", "theft", "CENTRE ST", "2018-01-01 12:00:00"),
            incident("E5", "theft", "CENTRE ST", "2018-01-01 13:00:00"),
            incident("E5", "theft", "WASHINGTON ST", "2018-01-01 14:00:00"),
        ];

        let result = top_street_per_district(&table(&incidents)).unwrap();

        assert_eq!(
            result,
            vec![
                StreetCount {
                    district: "E5".to_string(),
                    street: "CENTRE ST".to_string(),
                    count: 2,
                },
                StreetCount {
                    district: "D4".to_string(),
                    street: "BOYLSTON ST".to_string(),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn next_incident_shifts_forward_within_district() {
        // Input order deliberately not chronological.
        let incidents = vec![
            incident("A", "theft", "X ST", "2018-03-01 00:00:00"),
            incident("B", "theft", "X ST", "2018-01-01 00:00:00"),
            incident("A", "theft", "X ST", "2018-01-01 00:00:00"),
            incident("A", "theft", "X ST", "2018-02-01 00:00:00"),
        ];

        let frame = table(&incidents);
        let rows = last_incident_dates(&frame).unwrap();

        assert_eq!(rows.len(), incidents.len());
        for (row, incident) in rows.iter().zip(&incidents) {
            assert!(std::ptr::eq(row.incident, incident));
        }
        let dates: Vec<Option<String>> = rows
            .iter()
            .map(|r| r.last_incident_date.map(|d| d.to_string()))
            .collect();
        assert_eq!(
            dates,
            vec![
                None,
                None,
                Some("2018-02-01 00:00:00".to_string()),
                Some("2018-03-01 00:00:00".to_string()),
            ]
        );
    }

    #[test]
    fn next_incident_ties_follow_input_order() {
        let incidents = vec![
            incident("A", "first", "X ST", "2018-01-01 00:00:00"),
            incident("A", "second", "X ST", "2018-01-01 00:00:00"),
        ];

        let frame = table(&incidents);
        let rows = last_incident_dates(&frame).unwrap();

        assert_eq!(
            rows[0].last_incident_date,
            Some(incidents[1].occurred_on_date)
        );
        assert_eq!(rows[1].last_incident_date, None);
    }

    #[test]
    fn empty_table_yields_empty_results() {
        let empty = table(&[]);

        assert!(top_offense_per_district(&empty).unwrap().is_empty());
        assert!(top_street_per_district(&empty).unwrap().is_empty());
        assert!(last_incident_dates(&empty).unwrap().is_empty());
    }

    #[test]
    fn top_offense_skips_missing_descriptions() {
        let mut undescribed = vec![
            incident("A", "theft", "X ST", "2018-01-01 10:00:00"),
            incident("A", "towed", "X ST", "2018-01-02 10:00:00"),
            incident("A", "towed", "X ST", "2018-01-03 10:00:00"),
        ];
        undescribed[1].offense_description = None;
        undescribed[2].offense_description = None;

        let result = top_offense_per_district(&table(&undescribed)).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].offense_description, "theft");
        assert_eq!(result[0].count, 1);
    }

    #[test]
    fn district_without_descriptions_has_no_top_offense() {
        let mut incidents = vec![
            incident("A", "theft", "X ST", "2018-01-01 10:00:00"),
            incident("B", "towed", "X ST", "2018-01-02 10:00:00"),
        ];
        incidents[1].offense_description = None;

        let result = top_offense_per_district(&table(&incidents)).unwrap();

        let districts: Vec<&str> = result.iter().map(|r| r.district.as_str()).collect();
        assert_eq!(districts, vec!["A"]);
    }

    #[test]
    fn same_description_under_two_codes_counts_separately() {
        let mut incidents = vec![
            incident("A", "theft", "X ST", "2018-01-01 10:00:00"),
            incident("A", "theft", "X ST", "2018-01-02 10:00:00"),
            incident("A", "theft", "X ST", "2018-01-03 10:00:00"),
        ];
        incidents[0].offense_code = 614;
        incidents[1].offense_code = 619;
        incidents[2].offense_code = 619;

        let result = top_offense_per_district(&table(&incidents)).unwrap();

        assert_eq!((result[0].offense_code, result[0].count), (619, 2));
    }

    #[test]
    fn next_incident_never_crosses_districts() {
        let incidents = vec![
            incident("A", "theft", "X ST", "2018-01-01 00:00:00"),
            incident("B", "theft", "X ST", "2018-01-02 00:00:00"),
            incident("C", "theft", "X ST", "2018-01-03 00:00:00"),
        ];
        let frame = table(&incidents);

        let rows = last_incident_dates(&frame).unwrap();

        assert!(rows.iter().all(|r| r.last_incident_date.is_none()));
    }
}
