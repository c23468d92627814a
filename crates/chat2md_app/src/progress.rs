use std::sync::Mutex;
use std::time::Duration;

use chat2md_engine::{PipelineEvent, ProgressSink};
use engine_logging::engine_debug;
use indicatif::{ProgressBar, ProgressStyle};

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const MAX_ESTIMATE_SECS: usize = 600;

/// Rough structurizing time: one minute plus a second per hundred characters, capped at ten minutes.
pub fn structurize_estimate_secs(chars: usize) -> usize {
    (60 + chars / 100).min(MAX_ESTIMATE_SECS)
}

/// Drives a spinner with elapsed seconds through the two slow stages.
pub struct SpinnerSink {
    quiet: bool,
    active: Mutex<Option<ProgressBar>>,
}

impl SpinnerSink {
    /// A quiet sink never draws; used with `--verbose` so log lines are not overdrawn.
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            active: Mutex::new(None),
        }
    }

    fn start(&self, message: String) {
        let spinner = if self.quiet {
            ProgressBar::hidden()
        } else {
            let s = ProgressBar::new_spinner();
            let style = ProgressStyle::with_template("{spinner:.green} [{elapsed}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS);
            s.set_style(style);
            s.enable_steady_tick(Duration::from_millis(80));
            s
        };
        spinner.set_message(message);
        if let Ok(mut slot) = self.active.lock() {
            if let Some(previous) = slot.replace(spinner) {
                previous.finish_and_clear();
            }
        }
    }

    fn finish(&self, message: String) {
        if let Ok(mut slot) = self.active.lock() {
            if let Some(spinner) = slot.take() {
                spinner.finish_and_clear();
            }
        }
        println!("{message}");
    }
}

impl ProgressSink for SpinnerSink {
    fn emit(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::Extracting { source, from_url } => {
                if from_url {
                    self.start(format!("Extracting from URL (up to 60s): {source}"));
                } else {
                    self.start(format!("Extracting from webarchive: {source}"));
                }
            }
            PipelineEvent::Extracted { chars } => {
                self.finish(format!("✓ Extracted {chars} characters"));
            }
            PipelineEvent::Structurizing { chars, endpoint } => {
                self.start(format!(
                    "Structurizing {chars} chars with {endpoint} (~{}s)",
                    structurize_estimate_secs(chars)
                ));
            }
            PipelineEvent::Structurized { bytes } => {
                engine_debug!("structurized markdown: {} bytes", bytes);
                self.finish("✓ Structurized".to_string());
            }
            PipelineEvent::Writing { path } => {
                engine_debug!("writing {:?}", path);
            }
        }
    }
}

impl Drop for SpinnerSink {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.active.lock() {
            if let Some(spinner) = slot.take() {
                spinner.finish_and_clear();
            }
        }
    }
}
