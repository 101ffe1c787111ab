// src/ct_log/coordinator.rs
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::client::{CtLogClient, DEFAULT_TIMEOUT};
use super::log_list::LogRegistry;
use super::types::{AddChainRequest, CtLogProvider};
use crate::chain::CertificateChain;
use crate::error::{Result, SubmitError};
use crate::progress::ProgressIndicator;
use crate::report::{SubmissionOutcome, SubmissionReport};

/// Where SCT files go: `<dir>/<provider>[.<suffix>].sct`
#[derive(Debug, Clone)]
pub struct OutputTarget {
    dir: PathBuf,
    suffix: Option<String>,
}

impl OutputTarget {
    /// `dir` must be an existing directory; `suffix` must not contain path separators
    pub fn new(dir: impl Into<PathBuf>, suffix: Option<String>) -> Result<Self> {
        let dir = dir.into();

        if !dir.is_dir() {
            return Err(SubmitError::Input(format!(
                "output directory {} does not exist or is not a directory",
                dir.display()
            )));
        }

        let suffix = suffix.filter(|s| !s.is_empty());
        if let Some(ref s) = suffix {
            if s.contains(['/', '\\']) {
                return Err(SubmitError::Input(format!(
                    "file name suffix '{}' must not contain path separators",
                    s
                )));
            }
        }

        Ok(Self { dir, suffix })
    }

    pub fn path_for(&self, provider_name: &str) -> PathBuf {
        let file_name = match &self.suffix {
            Some(suffix) => format!("{}.{}.sct", provider_name, suffix),
            None => format!("{}.sct", provider_name),
        };
        self.dir.join(file_name)
    }
}

/// Fans one chain out to every log in the registry and waits for all of them
///
/// Each log gets its own task, client and output file. A failing log never
/// affects the others; its error is logged and recorded in the report.
pub struct SubmissionCoordinator {
    registry: Arc<LogRegistry>,
    timeout: Duration,
    progress: ProgressIndicator,
}

impl SubmissionCoordinator {
    pub fn new(registry: Arc<LogRegistry>) -> Self {
        Self {
            registry,
            timeout: DEFAULT_TIMEOUT,
            progress: ProgressIndicator::disabled(),
        }
    }

    /// Per-request timeout (default 10 seconds)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_progress(mut self, progress: ProgressIndicator) -> Self {
        self.progress = progress;
        self
    }

    pub fn registry(&self) -> &LogRegistry {
        &self.registry
    }

    /// Parse `pem_path` and submit the chain to every log
    ///
    /// Input and parse errors are returned before any request is sent;
    /// everything after that is reported per log.
    pub async fn submit_pem_file(
        &self,
        pem_path: &Path,
        output: &OutputTarget,
    ) -> Result<SubmissionReport> {
        if !pem_path.is_file() {
            return Err(SubmitError::Input(format!(
                "input file {} does not exist or is not a file",
                pem_path.display()
            )));
        }

        let chain = CertificateChain::from_pem_file(pem_path)?;
        let leaf = chain.leaf_summary();
        info!(
            "Loaded chain of {} certificate(s), leaf {} (sha256 {})",
            chain.len(),
            leaf.subject.as_deref().unwrap_or("<unparsed>"),
            leaf.fingerprint
        );

        let request = AddChainRequest::new(&chain);
        Ok(self.submit_all(&request, output).await)
    }

    /// Submit `request` to every log and wait until all submissions finished
    pub async fn submit_all(
        &self,
        request: &AddChainRequest,
        output: &OutputTarget,
    ) -> SubmissionReport {
        let payload = Arc::new(request.to_json());

        info!("Submitting chain to {} CT logs", self.registry.len());

        let mut tasks: Vec<(&CtLogProvider, JoinHandle<SubmissionOutcome>)> = Vec::new();

        // Spawn one task per log
        for provider in self.registry.providers() {
            debug!("Submitting certificate to {} CT log", provider.name);

            let task_provider = provider.clone();
            let payload = Arc::clone(&payload);
            let path = output.path_for(&provider.name);
            let timeout = self.timeout;
            let progress = self.progress.clone();

            let handle = tokio::spawn(async move {
                let outcome =
                    submit_one(&task_provider, &payload, path, timeout, &progress).await;
                progress.finish_one(&task_provider.name);
                outcome
            });

            tasks.push((provider, handle));
        }

        // Wait for every task, successful or not
        let mut outcomes = Vec::with_capacity(tasks.len());
        for (provider, handle) in tasks {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.progress
                        .suspend(|| error!("Submission task for {} failed: {}", provider.name, e));
                    let err = SubmitError::Task(e.to_string());
                    SubmissionOutcome::failed(&provider.name, &provider.url, &err)
                }
            };
            outcomes.push(outcome);
        }

        self.progress.finish();

        let report = SubmissionReport::new(outcomes);
        info!("{}", report.summary_line());
        report
    }
}

/// Submit to a single log and write its SCT, turning any failure into an outcome
async fn submit_one(
    provider: &CtLogProvider,
    payload: &[u8],
    path: PathBuf,
    timeout: Duration,
    progress: &ProgressIndicator,
) -> SubmissionOutcome {
    let result = async {
        let client = CtLogClient::new(provider, timeout)?;
        let sct = client.add_chain(payload.to_vec()).await?;
        sct.write_to(&path).await?;
        Ok::<_, SubmitError>(sct.timestamp)
    }
    .await;

    match result {
        Ok(timestamp) => {
            progress.suspend(|| {
                info!("Stored SCT from {} in {}", provider.name, path.display())
            });
            SubmissionOutcome::written(&provider.name, &provider.url, path, timestamp)
        }
        Err(e) => {
            progress.suspend(|| match &e {
                SubmitError::Server { status, body } => warn!(
                    "Unexpected status {} from {} ({}): {}",
                    status, provider.name, provider.url, body
                ),
                _ => warn!(
                    "Submission to {} ({}) failed [{}]: {}",
                    provider.name,
                    provider.url,
                    e.kind(),
                    e
                ),
            });
            SubmissionOutcome::failed(&provider.name, &provider.url, &e)
        }
    }
}
