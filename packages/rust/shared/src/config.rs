//! Run configuration for StandardForge.
//!
//! Credentials and org coordinates come from environment variables, with an
//! optional `.env` file autoloaded at startup. Settings are immutable for
//! the duration of one invocation; CLI flags only control logging and
//! dry-run behavior.

use url::Url;

use crate::error::{Result, StandardForgeError};

/// Default API base URL (the vendor's cloud endpoint).
pub const DEFAULT_API_URL: &str = "https://app.codacy.com";

/// Default console log level when `LOG_LEVEL` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

const ENV_API_TOKEN: &str = "CODACY_API_TOKEN";
const ENV_ORG_NAME: &str = "CODACY_ORG_NAME";
const ENV_PROVIDER: &str = "CODACY_PROVIDER";
const ENV_API_URL: &str = "CODACY_API_URL";
const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Load environment variables from a `.env` file in the working directory.
///
/// Missing files are fine; the environment itself may already carry the
/// required variables.
pub fn load_dotenv() {
    dotenv::dotenv().ok();
}

/// Immutable per-invocation settings sourced from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Account API token sent as the `api-token` header.
    pub api_token: String,
    /// Organization name on the platform.
    pub org_name: String,
    /// Git provider identifier (e.g. `gh`, `gl`, `bb`).
    pub provider: String,
    /// API base URL, no trailing slash.
    pub api_url: String,
    /// Console log level (`LOG_LEVEL`, defaults to `info`).
    pub log_level: String,
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// Fails fast with a [`StandardForgeError::Config`] before any HTTP
    /// call when a required variable is missing or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary key lookup (injectable for tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_token = required(&lookup, ENV_API_TOKEN)?;
        let org_name = required(&lookup, ENV_ORG_NAME)?;
        let provider = required(&lookup, ENV_PROVIDER)?;

        let api_url = optional(&lookup, ENV_API_URL, DEFAULT_API_URL);
        let api_url = api_url.trim_end_matches('/').to_string();
        Url::parse(&api_url).map_err(|e| {
            StandardForgeError::config(format!("invalid {ENV_API_URL} '{api_url}': {e}"))
        })?;

        let log_level = optional(&lookup, ENV_LOG_LEVEL, DEFAULT_LOG_LEVEL).to_lowercase();

        Ok(Self {
            api_token,
            org_name,
            provider,
            api_url,
            log_level,
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(StandardForgeError::config(format!(
            "required environment variable '{key}' is not set"
        ))),
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn loads_required_and_defaults() {
        let settings = Settings::from_lookup(env(&[
            ("CODACY_API_TOKEN", "tok-123"),
            ("CODACY_ORG_NAME", "acme"),
            ("CODACY_PROVIDER", "gh"),
        ]))
        .expect("settings load");

        assert_eq!(settings.api_token, "tok-123");
        assert_eq!(settings.org_name, "acme");
        assert_eq!(settings.provider, "gh");
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn missing_token_fails() {
        let result = Settings::from_lookup(env(&[
            ("CODACY_ORG_NAME", "acme"),
            ("CODACY_PROVIDER", "gh"),
        ]));

        let err = result.unwrap_err();
        assert!(err.to_string().contains("CODACY_API_TOKEN"));
    }

    #[test]
    fn empty_org_counts_as_missing() {
        let result = Settings::from_lookup(env(&[
            ("CODACY_API_TOKEN", "tok-123"),
            ("CODACY_ORG_NAME", "   "),
            ("CODACY_PROVIDER", "gh"),
        ]));

        assert!(result.is_err());
    }

    #[test]
    fn api_url_trailing_slash_is_trimmed() {
        let settings = Settings::from_lookup(env(&[
            ("CODACY_API_TOKEN", "tok-123"),
            ("CODACY_ORG_NAME", "acme"),
            ("CODACY_PROVIDER", "gh"),
            ("CODACY_API_URL", "https://codacy.internal.example/"),
        ]))
        .expect("settings load");

        assert_eq!(settings.api_url, "https://codacy.internal.example");
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        let result = Settings::from_lookup(env(&[
            ("CODACY_API_TOKEN", "tok-123"),
            ("CODACY_ORG_NAME", "acme"),
            ("CODACY_PROVIDER", "gh"),
            ("CODACY_API_URL", "not a url"),
        ]));

        let err = result.unwrap_err();
        assert!(err.to_string().contains("CODACY_API_URL"));
    }

    #[test]
    fn log_level_is_lowercased() {
        let settings = Settings::from_lookup(env(&[
            ("CODACY_API_TOKEN", "tok-123"),
            ("CODACY_ORG_NAME", "acme"),
            ("CODACY_PROVIDER", "gh"),
            ("LOG_LEVEL", "DEBUG"),
        ]))
        .expect("settings load");

        assert_eq!(settings.log_level, "debug");
    }
}
