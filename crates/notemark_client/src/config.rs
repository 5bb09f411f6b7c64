//! Credential and endpoint configuration.

use crate::error::{ApiError, ApiResult};

/// Default remote API version sent with every request.
pub const DEFAULT_API_VERSION: &str = "2022-06-28";

/// Default remote API base URL (without the `/v1` path segment).
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com";

/// Credentials and endpoint settings for the remote API.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Bearer auth token.
    pub token: String,
    /// API version string sent as the `Notion-Version` header.
    pub api_version: String,
    /// Base URL, normalized to exclude a trailing `/v1`.
    pub base_url: String,
}

impl Credentials {
    /// Creates credentials with default version and base URL.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_version: DEFAULT_API_VERSION.into(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    /// Overrides the base URL, normalizing a trailing `/v1`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(&base_url.into());
        self
    }

    /// Overrides the API version.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Loads credentials from the environment.
    ///
    /// `NOTION_TOKEN` is required; a missing or empty value is a fatal
    /// precondition for every remote operation. `NOTION_VERSION` and
    /// `NOTION_API_BASE` fall back to defaults when absent or empty.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when `NOTION_TOKEN` is unset.
    pub fn from_env() -> ApiResult<Self> {
        let token = non_empty_var("NOTION_TOKEN").ok_or(ApiError::MissingToken)?;
        let mut creds = Self::new(token);
        if let Some(version) = non_empty_var("NOTION_VERSION") {
            creds = creds.with_api_version(version);
        }
        if let Some(base) = non_empty_var("NOTION_API_BASE") {
            creds = creds.with_base_url(base);
        }
        Ok(creds)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn normalize_base_url(base: &str) -> String {
    let trimmed = base.trim_end_matches('/');
    trimmed.strip_suffix("/v1").unwrap_or(trimmed).to_string()
}

/// Masks a token for display: first and last four characters around an
/// ellipsis, or a redaction marker for short tokens.
pub fn mask_token(token: &str) -> String {
    if token.len() <= 8 {
        "**redacted**".into()
    } else {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_normalization_strips_v1() {
        assert_eq!(
            Credentials::new("t").with_base_url("https://api.example.com/v1").base_url,
            "https://api.example.com"
        );
        assert_eq!(
            Credentials::new("t").with_base_url("https://api.example.com/v1/").base_url,
            "https://api.example.com"
        );
        assert_eq!(
            Credentials::new("t").with_base_url("https://api.example.com").base_url,
            "https://api.example.com"
        );
    }

    #[test]
    fn token_masking() {
        assert_eq!(mask_token("secret_abcdefgh1234"), "secr...1234");
        assert_eq!(mask_token("short"), "**redacted**");
    }

    #[test]
    fn defaults() {
        let creds = Credentials::new("t");
        assert_eq!(creds.api_version, DEFAULT_API_VERSION);
        assert_eq!(creds.base_url, DEFAULT_BASE_URL);
    }
}
