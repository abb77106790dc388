use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use sarveil_core::pipeline::{PipelineStage, ProgressReporter};

/// Drives one indicatif bar per pipeline stage.
pub struct BarReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl Default for BarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl BarReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(ref bar) = *guard {
                f(bar);
            }
        }
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        let bar = match total_items {
            Some(total) => {
                let bar = ProgressBar::new(total as u64);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("{msg:22} [{bar:40}] {pos}/{len}")
                {
                    bar.set_style(style.progress_chars("=> "));
                }
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
                    bar.set_style(style);
                }
                bar
            }
        };
        bar.set_message(stage.to_string());
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(previous) = guard.replace(bar) {
                previous.finish_and_clear();
            }
        }
    }

    fn advance(&self, items_done: usize) {
        self.with_bar(|bar| bar.set_position(items_done as u64));
    }

    fn finish_stage(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }
}
