//! Authenticated client for the code-quality platform's v3 REST API.
//!
//! This crate owns everything HTTP: endpoint paths, the `data` response
//! envelope, cursor pagination, status-to-error mapping, the single bounded
//! retry on 429, and the pacing pause after mutating calls.

mod client;

pub use client::CodacyClient;
