// src/lib.rs
// Library interface for ct-submit
pub mod chain;
pub mod cli;
pub mod config;
pub mod ct_log;
pub mod error;
pub mod progress;
pub mod report;
