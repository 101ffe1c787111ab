// src/ct_log/mod.rs
pub mod client;
pub mod coordinator;
pub mod log_list;
pub mod sct;
pub mod types;

pub use client::CtLogClient;
pub use coordinator::{OutputTarget, SubmissionCoordinator};
pub use log_list::{LogListFetcher, LogRegistry};
pub use sct::SignedCertificateTimestamp;
pub use types::{AddChainRequest, AddChainResponse, CtLogProvider};
