//! The cleaned incident table as a polars [`DataFrame`].
//!
//! Queries build lazy plans over [`IncidentTable::lazy`] and read their
//! answers back out of the collected frame. Rows that must come back as
//! whole incidents carry the [`ROW`] index into the borrowed slice.

use crime_report_crime_models::Incident;
use polars::prelude::*;

/// Position of the row in the incident slice.
pub const ROW: &str = "ROW";
pub const OFFENSE_CODE: &str = "OFFENSE_CODE";
pub const OFFENSE_CODE_GROUP: &str = "OFFENSE_CODE_GROUP";
pub const OFFENSE_DESCRIPTION: &str = "OFFENSE_DESCRIPTION";
pub const DISTRICT: &str = "DISTRICT";
/// Occurrence time in epoch milliseconds.
pub const OCCURRED_ON_DATE: &str = "OCCURRED_ON_DATE";
pub const YEAR: &str = "YEAR";
pub const MONTH: &str = "MONTH";
pub const HOUR: &str = "HOUR";
pub const STREET: &str = "STREET";
pub const LAT: &str = "Lat";
pub const LONG: &str = "Long";
/// Group size produced by the counting queries.
pub const COUNT: &str = "size";

/// Incidents paired with their columnar form.
pub struct IncidentTable<'a> {
    incidents: &'a [Incident],
    frame: DataFrame,
}

impl<'a> IncidentTable<'a> {
    /// Builds the frame for `incidents`, one row per incident in slice
    /// order.
    ///
    /// # Errors
    ///
    /// * If polars rejects the assembled columns
    pub fn new(incidents: &'a [Incident]) -> PolarsResult<Self> {
        fn column<T, P>(name: &str, values: T) -> Column
        where
            Series: NamedFrom<T, P>,
            P: ?Sized,
        {
            Series::new(name.into(), values).into()
        }

        let frame = DataFrame::new(vec![
            column(
                OFFENSE_CODE,
                incidents.iter().map(|i| i.offense_code).collect::<Vec<_>>(),
            ),
            column(
                OFFENSE_CODE_GROUP,
                incidents
                    .iter()
                    .map(|i| i.offense_code_group.as_str())
                    .collect::<Vec<_>>(),
            ),
            column(
                OFFENSE_DESCRIPTION,
                incidents
                    .iter()
                    .map(|i| i.offense_description.as_deref())
                    .collect::<Vec<_>>(),
            ),
            column(
                DISTRICT,
                incidents
                    .iter()
                    .map(|i| i.district.as_str())
                    .collect::<Vec<_>>(),
            ),
            column(
                OCCURRED_ON_DATE,
                incidents
                    .iter()
                    .map(|i| i.occurred_on_date.and_utc().timestamp_millis())
                    .collect::<Vec<_>>(),
            ),
            column(YEAR, incidents.iter().map(|i| i.year).collect::<Vec<_>>()),
            column(MONTH, incidents.iter().map(|i| i.month).collect::<Vec<_>>()),
            column(HOUR, incidents.iter().map(|i| i.hour).collect::<Vec<_>>()),
            column(
                STREET,
                incidents
                    .iter()
                    .map(|i| i.street.as_deref())
                    .collect::<Vec<_>>(),
            ),
            column(LAT, incidents.iter().map(|i| i.lat).collect::<Vec<_>>()),
            column(LONG, incidents.iter().map(|i| i.long).collect::<Vec<_>>()),
        ])?
        .with_row_index(ROW.into(), None)?;

        log::debug!(
            "Built incident frame: {} rows x {} columns",
            frame.height(),
            frame.width()
        );

        Ok(Self { incidents, frame })
    }

    #[must_use]
    pub const fn incidents(&self) -> &'a [Incident] {
        self.incidents
    }

    #[must_use]
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// A lazy plan starting from the whole table.
    #[must_use]
    pub fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    /// The incident at `row`.
    ///
    /// # Errors
    ///
    /// * If `row` lies outside the table
    pub fn incident(&self, row: IdxSize) -> PolarsResult<&'a Incident> {
        usize::try_from(row)
            .ok()
            .and_then(|idx| self.incidents.get(idx))
            .ok_or_else(|| {
                PolarsError::OutOfBounds(
                    format!("row {row} outside a table of {}", self.incidents.len()).into(),
                )
            })
    }

    /// The incidents named by the [`ROW`] column of `result`, in its order.
    ///
    /// # Errors
    ///
    /// * If `result` has no [`ROW`] column or it names a row outside the
    ///   table
    pub fn rows(&self, result: &DataFrame) -> PolarsResult<Vec<&'a Incident>> {
        result
            .column(ROW)?
            .idx()?
            .into_iter()
            .flatten()
            .map(|row| self.incident(row))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::incident;

    #[test]
    fn frame_has_one_row_per_incident() {
        let incidents = vec![
            incident("B2", "Towed", "WASHINGTON ST", "2018-01-05 23:00:00"),
            incident("D4", "Larceny", "", "2018-02-01 12:00:00"),
        ];

        let table = IncidentTable::new(&incidents).unwrap();

        assert_eq!(table.frame().height(), 2);
        assert_eq!(table.frame().column(STREET).unwrap().null_count(), 1);
        let rows = table.rows(table.frame()).unwrap();
        assert!(std::ptr::eq(rows[1], &incidents[1]));
    }

    #[test]
    fn occurrence_is_stored_as_epoch_millis() {
        let incidents = vec![incident("B2", "Towed", "A ST", "2018-01-05 23:00:00")];

        let table = IncidentTable::new(&incidents).unwrap();

        let millis = table.frame().column(OCCURRED_ON_DATE).unwrap();
        assert_eq!(
            millis.i64().unwrap().get(0),
            Some(incidents[0].occurred_on_date.and_utc().timestamp_millis())
        );
    }

    #[test]
    fn rows_outside_the_table_are_errors() {
        let table = IncidentTable::new(&[]).unwrap();

        assert!(table.incident(0).is_err());
        assert_eq!(table.frame().height(), 0);
    }
}
