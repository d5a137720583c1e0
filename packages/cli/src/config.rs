//! Run configuration: an optional TOML file overlaid with command-line
//! flags.

use std::path::{Path, PathBuf};

use crime_report_analytics::{AnalysisOptions, DEFAULT_OFFENSE_GROUPS, DEFAULT_RECENT_LIMIT};
use crime_report_analytics_models::Question;
use crime_report_render::{DEFAULT_MAX_ROWS, TableFormat};
use crime_report_source_models::SourceConfig;
use serde::Deserialize;

/// Errors from loading or resolving the run configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`ReportConfig`].
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// No input file was given by flag, environment or config file.
    #[error("No input file given (use --input, CRIME_REPORT_INPUT or `input` in the config file)")]
    MissingInput,
}

/// Every setting a run accepts. Unset fields fall back to defaults when
/// resolved.
///
/// ```toml
/// input = "crime.csv"
/// output_dir = "report"
/// format = "html"
/// questions = ["q1", "q3"]
/// max_rows = 0 # show every row
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub encoding: Option<String>,
    pub delimiter: Option<char>,
    pub recent_limit: Option<usize>,
    /// Rows shown per table; `0` shows all.
    pub max_rows: Option<usize>,
    pub format: Option<TableFormat>,
    pub questions: Option<Vec<Question>>,
    pub offense_groups: Option<Vec<String>>,
    pub chart: Option<bool>,
}

/// A fully resolved run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub source: SourceConfig,
    pub output_dir: PathBuf,
    /// Report file; `None` prints to stdout.
    pub report: Option<PathBuf>,
    pub analysis: AnalysisOptions,
    /// Questions to answer, in report order.
    pub questions: Vec<Question>,
    pub format: TableFormat,
    pub max_rows: Option<usize>,
    pub chart: bool,
}

impl ReportConfig {
    /// Reads a config file.
    ///
    /// # Errors
    ///
    /// * If the file cannot be read
    /// * If the file is not valid TOML or has unknown keys
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Overlays `overrides` onto `self`; set fields in `overrides` win.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            input: overrides.input.or(self.input),
            output_dir: overrides.output_dir.or(self.output_dir),
            report: overrides.report.or(self.report),
            encoding: overrides.encoding.or(self.encoding),
            delimiter: overrides.delimiter.or(self.delimiter),
            recent_limit: overrides.recent_limit.or(self.recent_limit),
            max_rows: overrides.max_rows.or(self.max_rows),
            format: overrides.format.or(self.format),
            questions: overrides.questions.or(self.questions),
            offense_groups: overrides.offense_groups.or(self.offense_groups),
            chart: overrides.chart.or(self.chart),
        }
    }

    /// Fills in defaults.
    ///
    /// # Errors
    ///
    /// * If no input file is configured
    pub fn resolve(self) -> Result<RunSettings, ConfigError> {
        let input = self.input.ok_or(ConfigError::MissingInput)?;

        let mut source = SourceConfig::new(input);
        if let Some(encoding) = self.encoding {
            source.encoding = encoding;
        }
        if let Some(delimiter) = self.delimiter {
            source.delimiter = delimiter;
        }

        let questions = self.questions.map_or_else(
            || Question::all().to_vec(),
            |selected| {
                Question::all()
                    .iter()
                    .copied()
                    .filter(|q| selected.contains(q))
                    .collect()
            },
        );

        Ok(RunSettings {
            source,
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from(".")),
            report: self.report,
            analysis: AnalysisOptions {
                offense_groups: self.offense_groups.unwrap_or_else(|| {
                    DEFAULT_OFFENSE_GROUPS
                        .iter()
                        .map(ToString::to_string)
                        .collect()
                }),
                recent_limit: self.recent_limit.unwrap_or(DEFAULT_RECENT_LIMIT),
            },
            questions,
            format: self.format.unwrap_or_default(),
            max_rows: match self.max_rows {
                Some(0) => None,
                Some(n) => Some(n),
                None => Some(DEFAULT_MAX_ROWS),
            },
            chart: self.chart.unwrap_or(true),
        })
    }
}
