// src/ct_log/log_list.rs
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};

use super::client::add_chain_url;
use super::types::{CtLogProvider, LogListV3};
use crate::error::SubmitError;

pub const DEFAULT_LOG_LIST_URL: &str = "https://www.gstatic.com/ct/log_list/v3/log_list.json";

/// Immutable, validated set of CT logs to submit to
///
/// Names are unique and usable as file names, and every URL resolves to an
/// add-chain endpoint. Both are checked once, at construction.
#[derive(Debug, Clone)]
pub struct LogRegistry {
    providers: Vec<CtLogProvider>,
}

impl LogRegistry {
    pub fn new(providers: Vec<CtLogProvider>) -> Result<Self, SubmitError> {
        if providers.is_empty() {
            return Err(SubmitError::Config("log registry is empty".to_string()));
        }

        let mut names = HashSet::new();
        for provider in &providers {
            validate_name(&provider.name)?;

            if !names.insert(provider.name.as_str()) {
                return Err(SubmitError::Config(format!(
                    "duplicate log name '{}'",
                    provider.name
                )));
            }

            add_chain_url(&provider.url)?;
        }

        Ok(Self { providers })
    }

    /// The compiled-in registry
    pub fn builtin() -> Self {
        Self {
            providers: builtin_providers(),
        }
    }

    pub fn providers(&self) -> &[CtLogProvider] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

fn validate_name(name: &str) -> Result<(), SubmitError> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(SubmitError::Config(format!("invalid log name '{}'", name)));
    }

    if name.contains(['/', '\\']) {
        return Err(SubmitError::Config(format!(
            "log name '{}' must not contain path separators",
            name
        )));
    }

    Ok(())
}

/// Logs this tool submits to when no other registry is configured
fn builtin_providers() -> Vec<CtLogProvider> {
    [
        (
            "google_argon2018",
            "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAE0gBVBa3VR7QZu82V+ynXWD14JM3ORp37MtRxTmACJV5ZPtfUA7htQ2hofuigZQs+bnFZkje+qejxoyvk2Q1VaA==",
            "https://ct.googleapis.com/logs/argon2018/",
        ),
        (
            "google_argon2019",
            "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEI3MQm+HzXvaYa2mVlhB4zknbtAT8cSxakmBoJcBKGqGwYS0bhxSpuvABM1kdBTDpQhXnVdcq+LSiukXJRpGHVg==",
            "https://ct.googleapis.com/logs/argon2019/",
        ),
        (
            "google_xenon2018",
            "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAE1syJvwQdrv0a8dM2VAnK/SmHJNw/+FxC+CncFcnXMX2jNH9Xs7Q56FiV3taG5G2CokMsizhpcm7xXzuR3IHmag==",
            "https://ct.googleapis.com/logs/xenon2018/",
        ),
        (
            "google_xenon2019",
            "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAE/XyDwqzXL9i2GTjMYkqaEyiRL0Dy9sHq/BTebFdshbvCaXXEh6mjUK0Yy+AsDcI4MpzF1l7Kded2MD5zi420gA==",
            "https://ct.googleapis.com/logs/xenon2019/",
        ),
        (
            "google_icarus",
            "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAETtK8v7MICve56qTHHDhhBOuV4IlUaESxZryCfk9QbG9co/CqPvTsgPDbCpp6oFtyAHwlDhnvr7JijXRD9Cb2FA==",
            "https://ct.googleapis.com/icarus/",
        ),
        (
            "google_pilot",
            "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEfahLEimAoz2t01p3uMziiLOl/fHTDM0YDOhBRuiBARsV4UvxG2LdNgoIGLrtCzWE0J5APC2em4JlvR8EEEFMoA==",
            "https://ct.googleapis.com/pilot/",
        ),
        (
            "google_rocketeer",
            "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEIFsYyDzBi7MxCAC/oJBXK7dHjG+1aLCOkHjpoHPqTyghLpzA9BYbqvnV16mAw04vUjyYASVGJCUoI3ctBcJAeg==",
            "https://ct.googleapis.com/rocketeer/",
        ),
        (
            "cloudflare_nimbus_2018",
            "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEAsVpWvrH3Ke0VRaMg9ZQoQjb5g/xh1z3DDa6IuxY5DyPsk6brlvrUNXZzoIg0DcvFiAn2kd6xmu4Obk5XA/nRg==",
            "https://ct.cloudflare.com/logs/nimbus2018/",
        ),
        (
            "cloudflare_nimbus_2019",
            "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEkZHz1v5r8a9LmXSMegYZAg4UW+Ug56GtNfJTDNFZuubEJYgWf4FcC5D+ZkYwttXTDSo4OkanG9b3AI4swIQ28g==",
            "https://ct.cloudflare.com/logs/nimbus2019/",
        ),
        (
            "digicert_server_2",
            "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEzF05L2a4TH/BLgOhNKPoioYCrkoRxvcmajeb8Dj4XQmNY+gxa4Zmz3mzJTwe33i0qMVp+rfwgnliQ/bM/oFmhA==",
            "https://ct2.digicert-ct.com/log/",
        ),
        (
            "digicert_yeti_2018",
            "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAESYlKFDLLFmA9JScaiaNnqlU8oWDytxIYMfswHy9Esg0aiX+WnP/yj4O0ViEHtLwbmOQeSWBGkIu9YK9CLeer+g==",
            "https://yeti2018.ct.digicert.com/log/",
        ),
        (
            "digicert_yeti_2019",
            "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEkZd/ow8X+FSVWAVSf8xzkFohcPph/x6pS1JHh7g1wnCZ5y/8Hk6jzJxs6t3YMAWz2CPd4VkCdxwKexGhcFxD9A==",
            "https://yeti2019.ct.digicert.com/log/",
        ),
        (
            "digicert_nessie_2018",
            "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEVqpLa2W+Rz1XDZPBIyKJO+KKFOYZTj9MpJWnZeFUqzc5aivOiWEVhs8Gy2AlH3irWPFjIZPZMs3Dv7M+0LbPyQ==",
            "https://nessie2018.ct.digicert.com/log/",
        ),
        (
            "digicert_nessie_2019",
            "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEX+0nudCKImd7QCtelhMrDW0OXni5RE10tiiClZesmrwUk2iHLCoTHHVV+yg5D4n/rxCRVyRhikPpVDOLMLxJaA==",
            "https://nessie2019.ct.digicert.com/log/",
        ),
        (
            "comodo_mammoth",
            "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAE7+R9dC4VFbbpuyOL+yy14ceAmEf7QGlo/EmtYU6DRzwat43f/3swtLr/L8ugFOOt1YU/RFmMjGCL17ixv66MZw==",
            "https://mammoth.ct.comodo.com/",
        ),
        (
            "comodo_sabre",
            "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAE8m/SiQ8/xfiHHqtls9m7FyOMBg4JVZY9CgiixXGz0akvKD6DEL8S0ERmFe9U4ZiA0M4kbT5nmuk3I85Sk4bagA==",
            "https://sabre.ct.comodo.com/",
        ),
    ]
    .into_iter()
    .map(|(name, key, url)| CtLogProvider::new(name, key, url))
    .collect()
}

/// Map Google's log list to providers
///
/// Names are derived from each log's description; collisions get a
/// numeric suffix so every name stays unique.
pub fn providers_from_log_list(log_list: &LogListV3, include_readonly: bool) -> Vec<CtLogProvider> {
    let mut providers = Vec::new();
    let mut taken = HashSet::new();

    for operator in &log_list.operators {
        for log in &operator.logs {
            let acceptable = match &log.state {
                Some(state) => state.is_acceptable(include_readonly),
                None => false,
            };

            if !acceptable || log.url.is_empty() {
                continue;
            }

            let base = match slugify(&log.description) {
                s if s.is_empty() => slugify(&log.url),
                s => s,
            };

            let mut name = base.clone();
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = format!("{}_{}", base, n);
                n += 1;
            }

            debug!("Found log: {} ({}) as {}", log.description, log.url, name);
            providers.push(CtLogProvider::new(
                name,
                log.key.clone().unwrap_or_default(),
                log.url.clone(),
            ));
        }
    }

    providers
}

/// Lowercase ASCII alphanumerics, runs of anything else collapsed to `_`
fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_sep = false;

    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    out
}

/// Fetches Google's CT log list
pub struct LogListFetcher {
    http_client: reqwest::Client,
}

impl LogListFetcher {
    pub fn new() -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http_client })
    }

    /// Fetch the log list and return the logs currently accepting submissions
    ///
    /// # Arguments
    /// * `list_url` - URL of a v3 log list (usually Chrome's log_list.json)
    /// * `include_readonly` - Whether to include readonly logs as well
    pub async fn fetch_providers(&self, list_url: &str, include_readonly: bool) -> Result<LogRegistry> {
        info!("Fetching CT log list from {}", list_url);

        let response = self
            .http_client
            .get(list_url)
            .send()
            .await
            .context("Failed to fetch CT log list")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch log list: HTTP {}", response.status());
        }

        let log_list: LogListV3 = response
            .json()
            .await
            .context("Failed to parse log list JSON")?;

        let providers = providers_from_log_list(&log_list, include_readonly);

        info!(
            "Found {} acceptable CT logs (readonly={})",
            providers.len(),
            include_readonly
        );

        Ok(LogRegistry::new(providers)?)
    }
}
