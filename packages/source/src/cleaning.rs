//! Raw row normalization into the cleaned base table.
//!
//! Cleaning applies three steps: a missing district becomes
//! [`MISSING_DISTRICT`], street names are trimmed, and the occurrence
//! timestamp is parsed. An unparseable timestamp fails the whole load
//! instead of dropping the row.

use chrono::{Datelike as _, Timelike as _};
use crime_report_crime_models::{Incident, MISSING_DISTRICT};
use crime_report_source_models::RawIncident;

use crate::SourceError;
use crate::parsing::{parse_coordinate, parse_flag, parse_int, parse_occurred_on};

/// Human-readable list of the cleaning steps, for report output.
pub const CLEANING_STEPS: &[&str] = &[
    "stripped whitespace from STREET",
    "converted OCCURRED_ON_DATE to a timestamp",
    "mapped missing DISTRICT to 'not available' as a separate district",
];

/// Cleans every raw row, preserving input order.
///
/// # Errors
///
/// Returns [`SourceError::Parse`] for the first row holding an unparseable
/// required field.
pub fn clean_incidents(raw: Vec<RawIncident>) -> Result<Vec<Incident>, SourceError> {
    raw.into_iter()
        .zip(1_u64..)
        .map(|(raw, row)| clean_incident(row, raw))
        .collect()
}

/// Cleans one raw row. `row` is the 1-based data row number used in error
/// messages.
///
/// `YEAR`, `MONTH` and `HOUR` fall back to the occurrence timestamp when
/// blank.
///
/// # Errors
///
/// Returns [`SourceError::Parse`] if the timestamp is missing or invalid, or
/// if the offense code or a present calendar field is not an integer.
pub fn clean_incident(row: u64, raw: RawIncident) -> Result<Incident, SourceError> {
    let parse_error = |field: &'static str, value: Option<&str>| SourceError::Parse {
        row,
        field,
        value: value.unwrap_or_default().to_string(),
    };

    let occurred_on_date = raw
        .occurred_on_date
        .as_deref()
        .and_then(parse_occurred_on)
        .ok_or_else(|| parse_error("OCCURRED_ON_DATE", raw.occurred_on_date.as_deref()))?;

    let offense_code = raw
        .offense_code
        .as_deref()
        .and_then(parse_int)
        .ok_or_else(|| parse_error("OFFENSE_CODE", raw.offense_code.as_deref()))?;

    let calendar_field = |field: &'static str, value: Option<&str>, fallback: i32| match value {
        None => Ok(fallback),
        Some(s) => parse_int(s).ok_or_else(|| parse_error(field, Some(s))),
    };

    let year = calendar_field("YEAR", raw.year.as_deref(), occurred_on_date.year())?;
    let month = calendar_field(
        "MONTH",
        raw.month.as_deref(),
        i32::try_from(occurred_on_date.month()).unwrap_or_default(),
    )?;
    let hour = calendar_field(
        "HOUR",
        raw.hour.as_deref(),
        i32::try_from(occurred_on_date.hour()).unwrap_or_default(),
    )?;

    Ok(Incident {
        incident_number: raw.incident_number.unwrap_or_default(),
        offense_code,
        offense_code_group: raw.offense_code_group.unwrap_or_default(),
        offense_description: raw.offense_description,
        district: normalize_district(raw.district),
        reporting_area: raw.reporting_area,
        shooting: parse_flag(raw.shooting.as_deref()),
        occurred_on_date,
        year,
        month,
        day_of_week: raw.day_of_week.unwrap_or_default(),
        hour,
        ucr_part: raw.ucr_part,
        street: normalize_street(raw.street),
        lat: parse_coordinate(raw.lat.as_deref()),
        long: parse_coordinate(raw.long.as_deref()),
    })
}

/// Replaces a missing or blank district with [`MISSING_DISTRICT`].
#[must_use]
pub fn normalize_district(district: Option<String>) -> String {
    match district {
        Some(d) if !d.trim().is_empty() => d,
        _ => MISSING_DISTRICT.to_string(),
    }
}

/// Trims surrounding whitespace from a street name. A street that is blank
/// after trimming is treated as missing.
#[must_use]
pub fn normalize_street(street: Option<String>) -> Option<String> {
    let street = street?;
    let trimmed = street.trim();

    if trimmed.is_empty() {
        None
    } else if trimmed.len() == street.len() {
        Some(street)
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str) -> RawIncident {
        RawIncident {
            incident_number: Some("I1".to_string()),
            offense_code: Some("3115".to_string()),
            offense_code_group: Some("Investigate Person".to_string()),
            offense_description: Some("INVESTIGATE PERSON".to_string()),
            district: Some("B2".to_string()),
            occurred_on_date: Some(date.to_string()),
            year: Some("2018".to_string()),
            month: Some("9".to_string()),
            hour: Some("13".to_string()),
            street: Some("WASHINGTON ST".to_string()),
            ..RawIncident::default()
        }
    }

    #[test]
    fn missing_district_becomes_sentinel() {
        let mut r = raw("2018-09-02 13:00:00");
        r.district = None;
        let incident = clean_incident(1, r).unwrap();
        assert_eq!(incident.district, "not available");
    }

    #[test]
    fn blank_district_becomes_sentinel() {
        assert_eq!(normalize_district(Some("   ".to_string())), MISSING_DISTRICT);
        assert_eq!(normalize_district(Some("C11".to_string())), "C11");
    }

    #[test]
    fn street_is_trimmed() {
        let mut r = raw("2018-09-02 13:00:00");
        r.street = Some("  WASHINGTON ST\t".to_string());
        let incident = clean_incident(1, r).unwrap();
        assert_eq!(incident.street.as_deref(), Some("WASHINGTON ST"));
    }

    #[test]
    fn blank_street_is_missing() {
        assert_eq!(normalize_street(Some("   ".to_string())), None);
        assert_eq!(normalize_street(None), None);
    }

    #[test]
    fn every_cleaned_row_upholds_invariants() {
        let rows = vec![
            RawIncident {
                district: None,
                street: Some(" A ST ".to_string()),
                ..raw("2018-01-01 00:00:00")
            },
            RawIncident {
                district: Some(String::new()),
                street: Some("B ST".to_string()),
                ..raw("2018-01-02 00:00:00")
            },
            raw("2018-01-03 00:00:00"),
        ];

        let incidents = clean_incidents(rows).unwrap();

        assert_eq!(incidents.len(), 3);
        for incident in &incidents {
            assert!(!incident.district.is_empty());
            if let Some(street) = &incident.street {
                assert_eq!(street.trim(), street);
            }
        }
    }

    #[test]
    fn missing_offense_description_stays_missing() {
        let mut r = raw("2018-09-02 13:00:00");
        r.offense_description = None;
        let incident = clean_incident(1, r).unwrap();
        assert_eq!(incident.offense_description, None);
    }

    #[test]
    fn unparseable_date_fails_with_row_number() {
        let rows = vec![raw("2018-09-02 13:00:00"), raw("yesterday")];

        let err = clean_incidents(rows).unwrap_err();

        match err {
            SourceError::Parse { row, field, value } => {
                assert_eq!(row, 2);
                assert_eq!(field, "OCCURRED_ON_DATE");
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_date_fails() {
        let mut r = raw("");
        r.occurred_on_date = None;
        assert!(matches!(
            clean_incident(7, r),
            Err(SourceError::Parse { row: 7, .. })
        ));
    }

    #[test]
    fn blank_calendar_fields_fall_back_to_timestamp() {
        let mut r = raw("2017-06-15 21:45:00");
        r.year = None;
        r.month = None;
        r.hour = None;
        let incident = clean_incident(1, r).unwrap();
        assert_eq!((incident.year, incident.month, incident.hour), (2017, 6, 21));
    }

    #[test]
    fn invalid_hour_fails() {
        let mut r = raw("2017-06-15 21:45:00");
        r.hour = Some("late".to_string());
        assert!(matches!(
            clean_incident(1, r),
            Err(SourceError::Parse { field: "HOUR", .. })
        ));
    }
}
