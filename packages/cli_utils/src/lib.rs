#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing for the `crime_report` binary.
//!
//! The loader and the report pipeline only know about
//! [`ProgressCallback`]; this crate backs that trait with `indicatif` bars
//! and wires the `log` facade through the same [`MultiProgress`], so a
//! warning emitted mid-load lands above the bar instead of inside it.

use std::sync::Arc;
use std::time::Duration;

use crime_report_source::progress::ProgressCallback;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const BYTES_TEMPLATE: &str =
    "  {msg} {wide_bar:.cyan/dim} {bytes}/{total_bytes} {percent}% [{eta}]";
const STEPS_TEMPLATE: &str = "{msg} {wide_bar:.green/dim} {pos}/{len} [{elapsed_precise}]";

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

/// Progress reported to the terminal.
///
/// `sized_style` is applied when the total becomes known, which for the
/// file reader happens only after the file has been opened.
pub struct IndicatifProgress {
    bar: ProgressBar,
    sized_style: ProgressStyle,
}

impl IndicatifProgress {
    /// Progress over the bytes of the incident file. Spins until the file
    /// size arrives through [`ProgressCallback::set_total`].
    #[must_use]
    pub fn bytes_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());

        Arc::new(Self {
            bar,
            sized_style: bar_style(BYTES_TEMPLATE),
        })
    }

    /// One tick per answered question.
    #[must_use]
    pub fn steps_bar(
        multi: &MultiProgress,
        message: &str,
        total: u64,
    ) -> Arc<dyn ProgressCallback> {
        let style = bar_style(STEPS_TEMPLATE);
        let bar = multi.add(ProgressBar::new(total));
        bar.set_style(style.clone());
        bar.set_message(message.to_string());

        Arc::new(Self {
            bar,
            sized_style: style,
        })
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_style(self.sized_style.clone());
    }

    fn set_position(&self, pos: u64) {
        self.bar.set_position(pos);
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Installs `pretty_env_logger` (filtered by `RUST_LOG`) behind
/// `indicatif-log-bridge` and hands back the [`MultiProgress`] every bar of
/// the run should be added to.
///
/// Safe to call more than once; later calls keep the first logger.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(level);
    }

    multi
}
