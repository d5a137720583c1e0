#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Cleaned crime incident record and the calendar buckets used to
//! summarize incidents.
//!
//! Every analytical query operates on a slice of [`Incident`] values that
//! have already passed through the source crate's cleaning step, so the
//! invariants documented on each field hold for the whole table.

use chrono::{Month, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// District label substituted for incidents whose source row has no
/// district. Those incidents form their own group instead of being dropped.
pub const MISSING_DISTRICT: &str = "not available";

/// Left-closed, right-open hour boundaries of the day phase bins.
pub const PHASE_BOUNDS: [i32; 6] = [0, 6, 11, 17, 20, 24];

/// Phase assigned to each bin in [`PHASE_BOUNDS`]. Night appears twice so
/// that late evening and early morning wrap into the same phase.
pub const PHASE_LABELS: [DayPhase; 5] = [
    DayPhase::Night,
    DayPhase::Morning,
    DayPhase::Noon,
    DayPhase::Evening,
    DayPhase::Night,
];

/// Named phase of the day an incident occurred in.
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
pub enum DayPhase {
    /// 06:00 to 10:59
    Morning,
    /// 11:00 to 16:59
    Noon,
    /// 17:00 to 19:59
    Evening,
    /// 20:00 to 05:59
    Night,
}

impl DayPhase {
    /// Buckets an hour of the day into its phase.
    ///
    /// Returns `None` for hours outside `0..24`.
    #[must_use]
    pub fn from_hour(hour: i32) -> Option<Self> {
        PHASE_BOUNDS
            .windows(2)
            .position(|bin| (bin[0]..bin[1]).contains(&hour))
            .map(|idx| PHASE_LABELS[idx])
    }

    /// Position of this phase in report output (Morning first, Night last).
    #[must_use]
    pub const fn display_order(self) -> usize {
        match self {
            Self::Morning => 0,
            Self::Noon => 1,
            Self::Evening => 2,
            Self::Night => 3,
        }
    }

    /// Returns all phases in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Morning, Self::Noon, Self::Evening, Self::Night]
    }
}

/// Returns the three-letter English abbreviation for a 1-based month
/// number, or `None` if the number is not a month.
#[must_use]
pub fn month_abbr(month: i32) -> Option<&'static str> {
    let month = u8::try_from(month).ok()?;
    let month = Month::try_from(month).ok()?;
    month.name().get(..3)
}

/// A crime incident after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Report identifier. Not guaranteed unique across the dataset.
    pub incident_number: String,
    /// Numeric offense code.
    pub offense_code: i32,
    /// Coarse offense category (e.g. "Auto Theft", "Towed").
    pub offense_code_group: String,
    /// Fine-grained offense description, when the source has one.
    pub offense_description: Option<String>,
    /// Police district. Never empty; see [`MISSING_DISTRICT`].
    pub district: String,
    /// Reporting area code, if present.
    pub reporting_area: Option<String>,
    /// Whether a shooting was involved.
    pub shooting: bool,
    /// When the incident occurred.
    pub occurred_on_date: NaiveDateTime,
    /// Year the incident occurred, as reported by the source.
    pub year: i32,
    /// Month the incident occurred (1-12), as reported by the source.
    pub month: i32,
    /// Day of week name, as reported by the source.
    pub day_of_week: String,
    /// Hour of day the incident occurred (0-23), as reported by the source.
    pub hour: i32,
    /// Uniform Crime Reporting part, if present.
    pub ucr_part: Option<String>,
    /// Street name with surrounding whitespace removed. `None` when the
    /// source row has no street.
    pub street: Option<String>,
    /// Latitude, if present.
    pub lat: Option<f64>,
    /// Longitude, if present.
    pub long: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_wraps_around_midnight() {
        assert_eq!(DayPhase::from_hour(23), Some(DayPhase::Night));
        assert_eq!(DayPhase::from_hour(2), Some(DayPhase::Night));
        assert_eq!(DayPhase::from_hour(0), Some(DayPhase::Night));
        assert_eq!(DayPhase::from_hour(20), Some(DayPhase::Night));
    }

    #[test]
    fn boundaries_are_left_closed() {
        assert_eq!(DayPhase::from_hour(5), Some(DayPhase::Night));
        assert_eq!(DayPhase::from_hour(6), Some(DayPhase::Morning));
        assert_eq!(DayPhase::from_hour(10), Some(DayPhase::Morning));
        assert_eq!(DayPhase::from_hour(11), Some(DayPhase::Noon));
        assert_eq!(DayPhase::from_hour(16), Some(DayPhase::Noon));
        assert_eq!(DayPhase::from_hour(17), Some(DayPhase::Evening));
        assert_eq!(DayPhase::from_hour(19), Some(DayPhase::Evening));
    }

    #[test]
    fn phases_partition_the_day() {
        let mut counts = [0_u32; 4];
        for hour in 0..24 {
            let phase = DayPhase::from_hour(hour)
                .unwrap_or_else(|| panic!("hour {hour} has no phase"));
            counts[phase.display_order()] += 1;
        }
        assert_eq!(counts, [5, 6, 3, 10]);
        assert_eq!(counts.iter().sum::<u32>(), 24);
    }

    #[test]
    fn out_of_range_hours_have_no_phase() {
        assert_eq!(DayPhase::from_hour(24), None);
        assert_eq!(DayPhase::from_hour(-1), None);
    }

    #[test]
    fn display_order_matches_all() {
        for (idx, phase) in DayPhase::all().iter().enumerate() {
            assert_eq!(phase.display_order(), idx);
        }
    }

    #[test]
    fn phase_names_round_trip_through_strum() {
        assert_eq!(DayPhase::Evening.to_string(), "Evening");
        assert_eq!("Noon".parse::<DayPhase>().unwrap(), DayPhase::Noon);
    }

    #[test]
    fn month_abbreviations() {
        assert_eq!(month_abbr(1), Some("Jan"));
        assert_eq!(month_abbr(9), Some("Sep"));
        assert_eq!(month_abbr(12), Some("Dec"));
        assert_eq!(month_abbr(0), None);
        assert_eq!(month_abbr(13), None);
        assert_eq!(month_abbr(-3), None);
    }
}
