//! Terminal narration of the research workflow.

use crate::agent::{ProgressReporter, Stage};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{info, warn};

/// Prints each stage as a feed line under a spinner.
pub struct SpinnerReporter {
    spinner: ProgressBar,
}

impl SpinnerReporter {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner.set_message("🤖 Master Agent: Orchestrating Workflow...");

        Self { spinner }
    }
}

impl ProgressReporter for SpinnerReporter {
    fn stage(&self, stage: Stage) {
        info!("{}", stage);
        match stage {
            Stage::Complete => {
                self.spinner
                    .finish_with_message(format!("{} {}", stage.emoji(), stage));
            }
            Stage::Synthesis => {
                self.spinner
                    .set_message(format!("{} {}", stage.emoji(), stage));
            }
            _ => {
                self.spinner
                    .println(format!("   {} {}", stage.emoji(), stage));
            }
        }
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
        self.spinner.println(format!("   ⚠️  {}", message));
    }
}

impl Drop for SpinnerReporter {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
