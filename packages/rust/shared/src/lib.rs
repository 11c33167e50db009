//! Shared types, error model, and configuration for StandardForge.
//!
//! This crate is the foundation depended on by all other StandardForge crates.
//! It provides:
//! - [`StandardForgeError`], the unified error type
//! - Domain types ([`CodingStandard`], [`Tool`], [`Pattern`], [`StandardId`])
//! - Run configuration ([`Settings`], loaded from the environment)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{DEFAULT_API_URL, DEFAULT_LOG_LEVEL, Settings, load_dotenv};
pub use error::{Result, StandardForgeError};
pub use types::{
    CodingStandard, Pattern, PatternDefinition, PatternUpdate, SUPPORTED_LANGUAGES, StandardId,
    Tool,
};
