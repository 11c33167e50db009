//! Provisioning workflow for StandardForge.
//!
//! This crate ties the API client calls together into the end-to-end
//! `create` workflow: create standard, enable tools, disable minor
//! patterns, promote, set default.

pub mod provision;

pub use provision::{
    PATTERN_BATCH_SIZE, ProgressReporter, ProvisionConfig, ProvisionOutcome, SilentProgress,
    provision,
};
