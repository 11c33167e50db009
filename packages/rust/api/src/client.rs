//! The [`CodacyClient`] and its wire types.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use standardforge_shared::{
    CodingStandard, Pattern, PatternUpdate, Result, SUPPORTED_LANGUAGES, Settings,
    StandardForgeError, StandardId, Tool,
};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("StandardForge/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Page size for pattern listings.
const PATTERNS_PAGE_LIMIT: u32 = 100;

/// Pause after each mutating call; the platform throttles bursts of PATCHes.
const DEFAULT_MUTATION_PACE: Duration = Duration::from_secs(2);

/// Wait before the single 429 retry when the response carries no Retry-After.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(5);

/// Longest response body excerpt included in error messages.
const ERROR_BODY_EXCERPT: usize = 512;

// ---------------------------------------------------------------------------
// Wire envelopes
// ---------------------------------------------------------------------------

/// The platform wraps single resources and collections in a `data` envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Cursor-paginated collection response.
#[derive(Debug, Deserialize)]
struct Page<T> {
    data: Vec<T>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

/// Pagination block; a present cursor means another page exists.
#[derive(Debug, Deserialize)]
struct Pagination {
    #[serde(default)]
    cursor: Option<String>,
}

// ---------------------------------------------------------------------------
// CodacyClient
// ---------------------------------------------------------------------------

/// Authenticated client bound to one organization.
pub struct CodacyClient {
    http: Client,
    base_url: String,
    /// `organizations/{provider}/{org}` path segment shared by most endpoints.
    org_path: String,
    mutation_pace: Duration,
    retry_after_fallback: Duration,
}

impl CodacyClient {
    /// Build a client from validated settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(&settings.api_token).map_err(|_| {
            StandardForgeError::config("CODACY_API_TOKEN contains characters not valid in a header")
        })?;
        token.set_sensitive(true);
        headers.insert("api-token", token);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| StandardForgeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            org_path: format!(
                "organizations/{}/{}",
                settings.provider, settings.org_name
            ),
            mutation_pace: DEFAULT_MUTATION_PACE,
            retry_after_fallback: DEFAULT_RETRY_AFTER,
        })
    }

    /// Override the pause inserted after mutating calls (tests use zero).
    pub fn with_mutation_pace(mut self, pace: Duration) -> Self {
        self.mutation_pace = pace;
        self
    }

    /// Override the fallback wait before the single 429 retry.
    pub fn with_retry_after_fallback(mut self, wait: Duration) -> Self {
        self.retry_after_fallback = wait;
        self
    }

    // -----------------------------------------------------------------------
    // Endpoints
    // -----------------------------------------------------------------------

    /// Create a coding standard with the full supported-language list.
    ///
    /// The new standard starts life as a draft; see [`Self::promote`].
    pub async fn create_coding_standard(&self, name: &str) -> Result<CodingStandard> {
        let endpoint = format!("{}/coding-standards", self.org_path);
        let body = serde_json::json!({
            "name": name,
            "languages": SUPPORTED_LANGUAGES,
        });

        let response = self.send(Method::POST, &endpoint, Some(&body), &[]).await?;
        let envelope: Envelope<CodingStandard> = Self::decode(&endpoint, response).await?;
        Ok(envelope.data)
    }

    /// List the organization's existing coding standards.
    pub async fn list_coding_standards(&self) -> Result<Vec<CodingStandard>> {
        let endpoint = format!("{}/coding-standards", self.org_path);
        let response = self.send(Method::GET, &endpoint, None, &[]).await?;
        let envelope: Envelope<Vec<CodingStandard>> = Self::decode(&endpoint, response).await?;
        Ok(envelope.data)
    }

    /// Fetch the platform-wide analysis tool catalog.
    pub async fn list_tools(&self) -> Result<Vec<Tool>> {
        let endpoint = "tools";
        let response = self.send(Method::GET, endpoint, None, &[]).await?;
        let envelope: Envelope<Vec<Tool>> = Self::decode(endpoint, response).await?;
        Ok(envelope.data)
    }

    /// Enable a tool on the standard with its default pattern set.
    pub async fn enable_tool(&self, standard: StandardId, tool_uuid: &str) -> Result<()> {
        let endpoint = self.tool_endpoint(standard, tool_uuid);
        let body = serde_json::json!({ "enabled": true, "patterns": [] });

        self.send(Method::PATCH, &endpoint, Some(&body), &[]).await?;
        self.pace().await;
        Ok(())
    }

    /// List every pattern of a tool on the standard, following the cursor
    /// chain until the last page.
    pub async fn list_patterns(
        &self,
        standard: StandardId,
        tool_uuid: &str,
    ) -> Result<Vec<Pattern>> {
        let endpoint = format!("{}/patterns", self.tool_endpoint(standard, tool_uuid));
        let mut patterns = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = vec![("limit", PATTERNS_PAGE_LIMIT.to_string())];
            if let Some(c) = &cursor {
                query.push(("cursor", c.clone()));
            }

            let response = self.send(Method::GET, &endpoint, None, &query).await?;
            let page: Page<Pattern> = Self::decode(&endpoint, response).await?;
            patterns.extend(page.data);

            match page.pagination.and_then(|p| p.cursor) {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(patterns)
    }

    /// Apply a batch of pattern toggles to a tool on the standard.
    pub async fn update_patterns(
        &self,
        standard: StandardId,
        tool_uuid: &str,
        updates: &[PatternUpdate],
    ) -> Result<()> {
        let endpoint = self.tool_endpoint(standard, tool_uuid);
        let body = serde_json::json!({ "enabled": true, "patterns": updates });

        self.send(Method::PATCH, &endpoint, Some(&body), &[]).await?;
        self.pace().await;
        Ok(())
    }

    /// Promote a draft standard so it takes effect.
    pub async fn promote(&self, standard: StandardId) -> Result<()> {
        let endpoint = format!("{}/coding-standards/{standard}/promote", self.org_path);
        self.send(Method::POST, &endpoint, None, &[]).await?;
        Ok(())
    }

    /// Mark the standard as the organization default.
    pub async fn set_default(&self, standard: StandardId) -> Result<()> {
        let endpoint = format!("{}/coding-standards/{standard}/setDefault", self.org_path);
        let body = serde_json::json!({ "isDefault": true });
        self.send(Method::POST, &endpoint, Some(&body), &[]).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Request plumbing
    // -----------------------------------------------------------------------

    fn tool_endpoint(&self, standard: StandardId, tool_uuid: &str) -> String {
        format!(
            "{}/coding-standards/{standard}/tools/{tool_uuid}",
            self.org_path
        )
    }

    /// Issue one request, retrying exactly once on 429.
    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
        query: &[(&str, String)],
    ) -> Result<Response> {
        let url = format!("{}/api/v3/{endpoint}", self.base_url);
        let mut attempts: u8 = 0;

        loop {
            attempts += 1;

            let mut request = self.http.request(method.clone(), &url);
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(json) = body {
                request = request.json(json);
            }

            debug!(%method, %url, attempt = attempts, "sending request");

            let response = request
                .send()
                .await
                .map_err(|e| StandardForgeError::Network(format!("{url}: {e}")))?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempts > 1 {
                    return Err(StandardForgeError::RateLimited);
                }
                let wait = retry_after(&response).unwrap_or(self.retry_after_fallback);
                warn!(%url, wait_ms = wait.as_millis(), "rate limited, retrying once");
                tokio::time::sleep(wait).await;
                continue;
            }

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(StandardForgeError::Auth {
                    status: status.as_u16(),
                });
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(StandardForgeError::Api {
                    status: status.as_u16(),
                    message: excerpt(&message),
                });
            }

            return Ok(response);
        }
    }

    /// Decode a successful response body, mapping shape mismatches to
    /// [`StandardForgeError::UnexpectedResponse`].
    async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T> {
        let body = response
            .text()
            .await
            .map_err(|e| StandardForgeError::Network(format!("{endpoint}: body read failed: {e}")))?;

        serde_json::from_str(&body).map_err(|e| {
            StandardForgeError::unexpected(format!("{endpoint}: {e}; body: {}", excerpt(&body)))
        })
    }

    async fn pace(&self) {
        if !self.mutation_pace.is_zero() {
            tokio::time::sleep(self.mutation_pace).await;
        }
    }
}

/// Parse a `Retry-After` seconds value, if the response carries one.
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= ERROR_BODY_EXCERPT {
        trimmed.to_string()
    } else {
        let mut end = ERROR_BODY_EXCERPT;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}
