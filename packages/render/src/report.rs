//! Report document assembly.
//!
//! Headings and prose are Markdown; tables use the configured
//! [`TableFormat`], since HTML tables embed cleanly in Markdown.

use std::fmt::Write as _;
use std::path::Path;

use crime_report_analytics::Analysis;
use crime_report_analytics_models::{
    ColumnKind, ColumnSummary, LastIncidentRow, OffenseCount, PhaseMonthSummary, Question,
    StreetCount, timestamp_from_millis,
};
use crime_report_crime_models::{DayPhase, Incident};

use crate::table::{Table, float_cell, timestamp_cell};
use crate::{DEFAULT_MAX_ROWS, RenderError, TableFormat};

/// Document title.
pub const REPORT_TITLE: &str = "Boston Crime Report";

/// Presentation settings for [`render_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub format: TableFormat,
    /// Rows shown per table. `None` shows every row.
    pub max_rows: Option<usize>,
    /// Relative link to the chart image, if one was drawn.
    pub chart_link: Option<String>,
    /// Offense groups counted by [`Question::Q1`], for its caption.
    pub offense_groups: Vec<String>,
    /// Cleaning steps listed under the data description.
    pub cleaning_steps: Vec<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            format: TableFormat::default(),
            max_rows: Some(DEFAULT_MAX_ROWS),
            chart_link: None,
            offense_groups: Vec::new(),
            cleaning_steps: Vec::new(),
        }
    }
}

/// Caption of the phase-by-month table and chart.
#[must_use]
pub fn phase_month_caption(offense_groups: &[String]) -> String {
    if offense_groups.is_empty() {
        "Incidents by phase of day".to_string()
    } else {
        format!("{} by phase of day", offense_groups.join(" and "))
    }
}

/// Renders the full report for the answered `questions`, in the order given.
#[must_use]
pub fn render_report(
    analysis: &Analysis<'_>,
    questions: &[Question],
    options: &ReportOptions,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {REPORT_TITLE}\n");

    out.push_str("## Questions\n\n");
    out.push_str("Use the incident dataset to answer each of the following questions:\n\n");
    for question in questions {
        let _ = writeln!(out, "- **{question}**: {}", question.prompt());
    }
    out.push('\n');

    out.push_str("## Data Description\n\n");
    out.push_str(&describe_table(&analysis.summary).render(options.format, options.max_rows));
    if !options.cleaning_steps.is_empty() {
        out.push_str("\n### Data Cleaning\n\n");
        for step in &options.cleaning_steps {
            let _ = writeln!(out, "- {step}");
        }
    }

    for question in questions {
        let _ = writeln!(
            out,
            "\n## {}: {}\n",
            question.as_ref().to_uppercase(),
            question.title()
        );
        out.push_str(&render_section(analysis, *question, options));
    }

    out
}

fn render_section(analysis: &Analysis<'_>, question: Question, options: &ReportOptions) -> String {
    let not_answered = || "_Not computed._\n".to_string();
    let render = |table: Table| table.render(options.format, options.max_rows);

    match question {
        Question::Q1 => analysis.phase_month.as_ref().map_or_else(not_answered, |summary| {
            let caption = phase_month_caption(&options.offense_groups);
            let mut section = format!("{caption}, by month:\n\n");
            section.push_str(&render(phase_month_table(summary)));
            if let Some(link) = &options.chart_link {
                let _ = writeln!(section, "\n![{caption}]({link})");
            }
            section
        }),
        Question::Q2 => analysis.top_offenses.as_deref().map_or_else(not_answered, |rows| {
            lead(
                "The most frequent offense of each district, with its count:",
                &render(top_offense_table(rows)),
            )
        }),
        Question::Q3 => analysis.last_incidents.as_deref().map_or_else(not_answered, |rows| {
            let mut section = String::from(
                "`last_incident_date` holds the time of the *next* incident in the same \
                 district; the latest incident of each district has none.\n\n",
            );
            section.push_str(&render(last_incident_table(rows)));
            section
        }),
        Question::Q4 => analysis.top_streets.as_deref().map_or_else(not_answered, |rows| {
            lead(
                "The street with the most incidents in each district:",
                &render(top_street_table(rows)),
            )
        }),
        Question::Q5 => analysis
            .recent_incidents
            .as_deref()
            .map_or_else(not_answered, |rows| {
                lead(
                    "The most recent incidents on each street, newest first:",
                    &render(incident_table(rows)),
                )
            }),
    }
}

fn lead(sentence: &str, table: &str) -> String {
    format!("{sentence}\n\n{table}")
}

/// Writes `document` to `path`, creating parent directories.
///
/// # Errors
///
/// * If the directory or file cannot be written
pub fn write_report(document: &str, path: &Path) -> Result<(), RenderError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, document)?;
    log::info!("Wrote report to {}", path.display());
    Ok(())
}

/// Statistics as rows, one column per summarized field. Timestamp columns
/// show their statistics as timestamps.
#[must_use]
pub fn describe_table(summary: &[ColumnSummary]) -> Table {
    let mut table = Table::new(std::iter::once("").chain(summary.iter().map(|s| s.name)));

    table.push_row(
        std::iter::once("count".to_string())
            .chain(summary.iter().map(|s| s.count.to_string()))
            .collect(),
    );

    let stats: [(&str, fn(&ColumnSummary) -> Option<f64>); 7] = [
        ("mean", |s| s.mean),
        ("std", |s| s.std),
        ("min", |s| s.min),
        ("25%", |s| s.q25),
        ("50%", |s| s.q50),
        ("75%", |s| s.q75),
        ("max", |s| s.max),
    ];
    for (label, stat) in stats {
        table.push_row(
            std::iter::once(label.to_string())
                .chain(summary.iter().map(|s| match s.kind {
                    ColumnKind::Number => float_cell(stat(s)),
                    ColumnKind::Timestamp => {
                        timestamp_cell(stat(s).and_then(timestamp_from_millis))
                    }
                }))
                .collect(),
        );
    }

    table
}

/// Phases as rows in display order, months as columns.
#[must_use]
pub fn phase_month_table(summary: &PhaseMonthSummary) -> Table {
    let mut table = Table::new(std::iter::once("phases").chain(PhaseMonthSummary::month_labels()));
    for phase in DayPhase::all() {
        table.push_row(
            std::iter::once(phase.to_string())
                .chain(summary.row(*phase).iter().map(ToString::to_string))
                .collect(),
        );
    }
    table
}

#[must_use]
pub fn top_offense_table(rows: &[OffenseCount]) -> Table {
    let mut table = Table::new(["DISTRICT", "OFFENSE_CODE", "OFFENSE_DESCRIPTION", "size"]);
    for row in rows {
        table.push_row(vec![
            row.district.clone(),
            row.offense_code.to_string(),
            row.offense_description.clone(),
            row.count.to_string(),
        ]);
    }
    table
}

#[must_use]
pub fn last_incident_table(rows: &[LastIncidentRow<'_>]) -> Table {
    let mut table = Table::new([
        "DISTRICT",
        "OCCURRED_ON_DATE",
        "OFFENSE_DESCRIPTION",
        "last_incident_date",
    ]);
    for row in rows {
        table.push_row(vec![
            row.incident.district.clone(),
            timestamp_cell(Some(row.incident.occurred_on_date)),
            row.incident.offense_description.clone().unwrap_or_default(),
            timestamp_cell(row.last_incident_date),
        ]);
    }
    table
}

#[must_use]
pub fn top_street_table(rows: &[StreetCount]) -> Table {
    let mut table = Table::new(["DISTRICT", "STREET", "size"]);
    for row in rows {
        table.push_row(vec![
            row.district.clone(),
            row.street.clone(),
            row.count.to_string(),
        ]);
    }
    table
}

/// Every incident column, in source order.
#[must_use]
pub fn incident_table(rows: &[&Incident]) -> Table {
    let mut table = Table::new([
        "INCIDENT_NUMBER",
        "OFFENSE_CODE",
        "OFFENSE_CODE_GROUP",
        "OFFENSE_DESCRIPTION",
        "DISTRICT",
        "REPORTING_AREA",
        "SHOOTING",
        "OCCURRED_ON_DATE",
        "YEAR",
        "MONTH",
        "DAY_OF_WEEK",
        "HOUR",
        "UCR_PART",
        "STREET",
        "Lat",
        "Long",
    ]);
    for incident in rows {
        table.push_row(vec![
            incident.incident_number.clone(),
            incident.offense_code.to_string(),
            incident.offense_code_group.clone(),
            incident.offense_description.clone().unwrap_or_default(),
            incident.district.clone(),
            incident.reporting_area.clone().unwrap_or_default(),
            if incident.shooting { "Y" } else { "" }.to_string(),
            timestamp_cell(Some(incident.occurred_on_date)),
            incident.year.to_string(),
            incident.month.to_string(),
            incident.day_of_week.clone(),
            incident.hour.to_string(),
            incident.ucr_part.clone().unwrap_or_default(),
            incident.street.clone().unwrap_or_default(),
            incident.lat.map(|v| v.to_string()).unwrap_or_default(),
            incident.long.map(|v| v.to_string()).unwrap_or_default(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use crime_report_analytics::{AnalysisOptions, IncidentTable};

    use super::*;

    fn incident(district: &str, offense: &str, street: Option<&str>, occurred: &str) -> Incident {
        let occurred_on_date =
            NaiveDateTime::parse_from_str(occurred, crate::table::TIMESTAMP_FORMAT).unwrap();
        Incident {
            incident_number: "I182070945".to_string(),
            offense_code: 619,
            offense_code_group: offense.to_string(),
            offense_description: Some(offense.to_uppercase()),
            district: district.to_string(),
            reporting_area: Some("808".to_string()),
            shooting: false,
            occurred_on_date,
            year: 2018,
            month: 9,
            day_of_week: "Sunday".to_string(),
            hour: 13,
            ucr_part: Some("Part One".to_string()),
            street: street.map(ToString::to_string),
            lat: Some(42.357_910_24),
            long: Some(-71.139_371_68),
        }
    }

    fn fixture() -> Vec<Incident> {
        vec![
            incident("B2", "Towed", Some("WASHINGTON ST"), "2018-09-02 13:00:00"),
            incident("B2", "Towed", Some("WASHINGTON ST"), "2018-09-03 21:00:00"),
            incident("D4", "Larceny", Some("BOYLSTON ST"), "2018-09-04 08:00:00"),
        ]
    }

    fn options() -> ReportOptions {
        ReportOptions {
            format: TableFormat::Markdown,
            chart_link: Some(crate::CHART_FILE_NAME.to_string()),
            offense_groups: vec!["Auto Theft".to_string(), "Towed".to_string()],
            cleaning_steps: vec!["stripped whitespace from STREET".to_string()],
            ..ReportOptions::default()
        }
    }

    #[test]
    fn report_has_every_requested_section_in_order() {
        let incidents = fixture();
        let analysis =
            Analysis::run(&incidents, &AnalysisOptions::default(), Question::all()).unwrap();

        let report = render_report(&analysis, Question::all(), &options());

        let headings = [
            "# Boston Crime Report",
            "## Questions",
            "## Data Description",
            "### Data Cleaning",
            "## Q1: Crime Count",
            "## Q2: Most Occurred Offense In A District",
            "## Q3: Previous Incident Date In Each District",
            "## Q4: Streets With Highest Incidents In Each District",
            "## Q5: Recent Incidents For Each Street",
        ];
        let positions: Vec<usize> = headings
            .iter()
            .map(|h| report.find(h).unwrap_or_else(|| panic!("missing {h}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(report.contains("![Auto Theft and Towed by phase of day](crime-count.svg)"));
        assert!(report.contains("- stripped whitespace from STREET"));
    }

    #[test]
    fn skipped_questions_are_left_out() {
        let incidents = fixture();
        let analysis =
            Analysis::run(&incidents, &AnalysisOptions::default(), &[Question::Q4]).unwrap();

        let report = render_report(&analysis, &[Question::Q4], &options());

        assert!(report.contains("## Q4:"));
        assert!(!report.contains("## Q1:"));
        assert!(!report.contains("crime-count.svg"));
        assert!(report.contains("| B2 | WASHINGTON ST | 2 |"));
    }

    #[test]
    fn unanswered_question_is_marked() {
        let analysis = Analysis::default();

        let report = render_report(&analysis, &[Question::Q2], &options());

        assert!(report.contains("_Not computed._"));
    }

    #[test]
    fn phase_month_table_lists_phases_in_display_order() {
        let mut summary = PhaseMonthSummary::default();
        summary.record(DayPhase::Night, 9);

        let table = phase_month_table(&summary);

        assert_eq!(table.headers.len(), 13);
        assert_eq!(table.headers[1], "Jan");
        let phases: Vec<&str> = table.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(phases, vec!["Morning", "Noon", "Evening", "Night"]);
        assert_eq!(table.rows[3][9], "1");
        assert_eq!(table.rows[0][9], "0");
    }

    #[test]
    fn last_incident_table_leaves_latest_blank() {
        let incidents = fixture();
        let frame = IncidentTable::new(&incidents).unwrap();
        let rows = crime_report_analytics::district::last_incident_dates(&frame).unwrap();

        let table = last_incident_table(&rows);

        assert_eq!(table.rows[0][3], "2018-09-03 21:00:00");
        assert_eq!(table.rows[1][3], "");
        assert_eq!(table.rows[2][3], "");
    }

    #[test]
    fn describe_table_has_stat_rows() {
        let incidents = fixture();
        let summary =
            crime_report_analytics::describe::describe(&IncidentTable::new(&incidents).unwrap())
                .unwrap();

        let table = describe_table(&summary);

        let labels: Vec<&str> = table.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(
            labels,
            vec!["count", "mean", "std", "min", "25%", "50%", "75%", "max"]
        );
        assert_eq!(table.headers[1], "OFFENSE_CODE");
        assert_eq!(table.rows[0][1], "3");
        assert_eq!(table.rows[1][1], "619.0");
        assert_eq!(table.headers[2], "OCCURRED_ON_DATE");
        assert_eq!(table.rows[3][2], "2018-09-02 13:00:00");
        assert_eq!(table.rows[7][2], "2018-09-04 08:00:00");
        assert_eq!(table.rows[2][2], "");
    }

    #[test]
    fn incident_table_renders_missing_values_empty() {
        let mut bare = incident("B2", "Towed", None, "2018-09-02 13:00:00");
        bare.lat = None;
        bare.reporting_area = None;

        let table = incident_table(&[&bare]);

        assert_eq!(table.headers.len(), table.rows[0].len());
        assert_eq!(table.rows[0][5], "");
        assert_eq!(table.rows[0][13], "");
        assert_eq!(table.rows[0][14], "");
    }

    #[test]
    fn writes_report_creating_directories() {
        let dir = std::env::temp_dir().join(format!("crime_report_render_{}", std::process::id()));
        let path = dir.join("nested").join("report.md");

        write_report("# Boston Crime Report\n", &path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# Boston Crime Report\n"
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
