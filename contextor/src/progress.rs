//! Lightweight progress reporting for the pipeline stages.
//!
//! Use `NoopProgress` for headless runs and tests, `IndicatifProgress` on a TTY.

use std::io::{self, IsTerminal};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Minimal progress interface used by [`crate::run_pipeline`].
pub trait Progress: Send + Sync {
    /// Advance by one step and show a short message.
    fn step(&self, _msg: &str) {}
    /// Finish the UI.
    fn finish(&self, _msg: &str) {}
}

/// No-op reporter.
#[derive(Default, Clone, Copy)]
pub struct NoopProgress;
impl Progress for NoopProgress {}

/// Indicatif spinner.
pub struct IndicatifProgress {
    pb: ProgressBar,
}

impl IndicatifProgress {
    /// Spinner (unknown total).
    pub fn spinner() -> Self {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} [{elapsed}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("-\\|/ ");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        Self { pb }
    }
}

impl Progress for IndicatifProgress {
    fn step(&self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }
    fn finish(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }
}

/// Spinner when stdout is a terminal, silent otherwise.
pub fn for_stdout() -> Box<dyn Progress> {
    if io::stdout().is_terminal() {
        Box::new(IndicatifProgress::spinner())
    } else {
        Box::new(NoopProgress)
    }
}
