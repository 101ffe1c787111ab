// src/progress.rs
//! Progress indicator using indicatif

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar over the logs of one run
///
/// Cheap to clone; clones drive the same bar, so each submission task can
/// hold its own handle.
#[derive(Clone)]
pub struct ProgressIndicator {
    bar: Option<ProgressBar>,
}

impl ProgressIndicator {
    /// Create a progress indicator for `total` submissions
    pub fn new(enabled: bool, total: usize) -> Self {
        if !enabled {
            return Self::disabled();
        }

        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar: Some(bar) }
    }

    pub fn disabled() -> Self {
        Self { bar: None }
    }

    /// Record one finished submission
    pub fn finish_one(&self, provider: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(provider.to_string());
            bar.inc(1);
        }
    }

    /// Temporarily hide the bar to print other output
    ///
    /// Log lines share stderr with the bar, so anything logged while the
    /// bar is drawn should go through here.
    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if let Some(ref bar) = self.bar {
            bar.suspend(f)
        } else {
            f()
        }
    }

    /// Finish and clear the progress bar
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.bar.is_some()
    }
}
