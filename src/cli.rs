// src/cli.rs
use clap::Parser;
use std::path::PathBuf;

/// ct-submit: submit a certificate chain to Certificate Transparency logs
///
/// Sends the chain to every configured CT log and stores each returned
/// SCT as `<output>/<log>[.<filename>].sct`, ready for nginx's
/// `ssl_ct_static_scts` directive.
#[derive(Parser, Debug, Clone)]
#[command(name = "ct-submit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    // ===== Input & Output =====
    /// Path of the PEM certificate chain to submit
    #[arg(short = 'i', long = "input", required_unless_present = "list_logs")]
    pub input: Option<PathBuf>,

    /// Directory to write the .sct files to
    #[arg(short = 'o', long = "output", required_unless_present = "list_logs")]
    pub output: Option<PathBuf>,

    /// Optional file name part: <log>.<filename>.sct
    #[arg(short = 'f', long = "filename")]
    pub filename: Option<String>,

    // ===== Configuration =====
    /// Path to TOML config file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Load logs from a Google v3 log list instead of the built-in registry
    #[arg(long = "log-list-url")]
    pub log_list_url: Option<String>,

    /// Override the per-request timeout in seconds
    #[arg(long = "timeout")]
    pub timeout: Option<u64>,

    // ===== Display =====
    /// Print the report as JSON to stdout
    #[arg(short = 'j', long = "json")]
    pub json: bool,

    /// Disable progress indicator
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    // ===== Logging =====
    /// Verbose logging (set log level to debug)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Quiet logging (set log level to warn)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    // ===== Utility Commands =====
    /// Print the logs that would be submitted to and exit
    ///
    /// The built-in Comodo logs are named comodo_mammoth and comodo_sabre;
    /// earlier releases wrote them as commodo_*.sct, so nginx configs that
    /// list SCT files by name need updating.
    #[arg(long = "list-logs")]
    pub list_logs: bool,
}

impl Cli {
    /// Validate flag combinations and return errors for invalid usage
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.verbose && self.quiet {
            anyhow::bail!("Cannot specify both --verbose and --quiet");
        }

        if self.timeout == Some(0) {
            anyhow::bail!("--timeout must be greater than 0");
        }

        if let Some(ref filename) = self.filename {
            if filename.contains(['/', '\\']) {
                anyhow::bail!("--filename must not contain path separators");
            }
        }

        Ok(())
    }

    /// Check if progress indicator should be enabled
    pub fn should_show_progress(&self) -> bool {
        !self.no_progress && !self.json
    }

    /// Log level forced by flags, if any
    pub fn log_level_override(&self) -> Option<&str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("warn")
        } else {
            None
        }
    }
}
