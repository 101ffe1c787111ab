// src/report.rs
//! Per-log outcomes of a submission run

use chrono::DateTime;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use crate::error::SubmitError;

/// Outcome of submitting to one log
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub provider: String,
    pub url: String,
    #[serde(flatten)]
    pub status: SubmissionStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// SCT written to `path`
    Written { path: PathBuf, timestamp: u64 },
    Failed { kind: String, reason: String },
}

impl SubmissionOutcome {
    pub fn written(provider: &str, url: &str, path: PathBuf, timestamp: u64) -> Self {
        Self {
            provider: provider.to_string(),
            url: url.to_string(),
            status: SubmissionStatus::Written { path, timestamp },
        }
    }

    pub fn failed(provider: &str, url: &str, error: &SubmitError) -> Self {
        Self {
            provider: provider.to_string(),
            url: url.to_string(),
            status: SubmissionStatus::Failed {
                kind: error.kind().to_string(),
                reason: error.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, SubmissionStatus::Written { .. })
    }
}

/// Outcomes of one run, in registry order
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubmissionReport {
    pub outcomes: Vec<SubmissionOutcome>,
}

impl SubmissionReport {
    pub fn new(outcomes: Vec<SubmissionOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Paths of all SCT files written during the run
    pub fn written_files(&self) -> Vec<&PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.status {
                SubmissionStatus::Written { path, .. } => Some(path),
                SubmissionStatus::Failed { .. } => None,
            })
            .collect()
    }

    pub fn summary_line(&self) -> String {
        format!("{}/{} logs accepted the chain", self.succeeded(), self.total())
    }

    /// Render one line per log plus a summary line
    pub fn format_human(&self, use_colors: bool) -> String {
        let mut out = String::new();

        for outcome in &self.outcomes {
            let line = match &outcome.status {
                SubmissionStatus::Written { path, timestamp } => {
                    let tag = if use_colors {
                        "OK".green().bold().to_string()
                    } else {
                        "OK".to_string()
                    };
                    format!(
                        "{:<6} {:<28} {} ({})",
                        tag,
                        outcome.provider,
                        path.display(),
                        format_timestamp(*timestamp)
                    )
                }
                SubmissionStatus::Failed { kind, reason } => {
                    let tag = if use_colors {
                        "FAILED".red().bold().to_string()
                    } else {
                        "FAILED".to_string()
                    };
                    format!("{:<6} {:<28} {}: {}", tag, outcome.provider, kind, reason)
                }
            };
            out.push_str(&line);
            out.push('\n');
        }

        out.push_str(&self.summary_line());
        out
    }
}

/// Format an SCT timestamp (milliseconds since epoch) as a UTC date
pub fn format_timestamp(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ms.to_string())
}
