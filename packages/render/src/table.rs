//! Plain string tables and their Markdown/HTML rendering.

use std::fmt::Write as _;

use chrono::NaiveDateTime;

use crate::TableFormat;

/// Timestamp layout used in every table cell.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A rectangular table of preformatted cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Renders the table, showing at most `max_rows` rows (all rows when
    /// `None`) followed by a note on how many were left out.
    #[must_use]
    pub fn render(&self, format: TableFormat, max_rows: Option<usize>) -> String {
        let shown = max_rows.map_or(self.rows.len(), |max| max.min(self.rows.len()));
        let hidden = self.rows.len() - shown;
        let rows = &self.rows[..shown];

        let mut out = match format {
            TableFormat::Markdown => self.markdown(rows),
            TableFormat::Html => self.html(rows),
        };

        if hidden > 0 {
            let _ = writeln!(
                out,
                "\n_{hidden} more rows not shown ({} total)._",
                self.rows.len()
            );
        }
        out
    }

    fn markdown(&self, rows: &[Vec<String>]) -> String {
        let mut out = String::new();
        push_markdown_row(&mut out, &self.headers);
        out.push('|');
        for _ in &self.headers {
            out.push_str(" --- |");
        }
        out.push('\n');
        for row in rows {
            push_markdown_row(&mut out, row);
        }
        out
    }

    fn html(&self, rows: &[Vec<String>]) -> String {
        let mut out = String::from("<table>\n  <thead>\n    <tr>");
        for header in &self.headers {
            let _ = write!(out, "<th>{}</th>", escape_html(header));
        }
        out.push_str("</tr>\n  </thead>\n  <tbody>\n");
        for row in rows {
            out.push_str("    <tr>");
            for cell in row {
                let _ = write!(out, "<td>{}</td>", escape_html(cell));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("  </tbody>\n</table>\n");
        out
    }
}

fn push_markdown_row(out: &mut String, cells: &[String]) {
    out.push('|');
    for cell in cells {
        let _ = write!(out, " {} |", cell.replace('|', "\\|"));
    }
    out.push('\n');
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Formats a timestamp cell. Missing timestamps render empty.
#[must_use]
pub fn timestamp_cell(value: Option<NaiveDateTime>) -> String {
    value.map_or_else(String::new, |v| v.format(TIMESTAMP_FORMAT).to_string())
}

/// Formats a statistic with one decimal place. Missing values render
/// empty.
#[must_use]
pub fn float_cell(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| format!("{v:.1}"))
}
