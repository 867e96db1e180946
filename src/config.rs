use std::fmt;

/// Environment variable holding the remote API base URL.
pub const BASE_URL_ENV: &str = "BIGO_API_BASE_URL";
/// Environment variable holding the bearer credential.
pub const TOKEN_ENV: &str = "BIGO_API_TOKEN";

/// Base URL and bearer credential of the remote BIGO API.
///
/// Loaded once at startup and never mutated afterwards; build a new client to
/// rotate credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    token: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Reads the configuration from `BIGO_API_BASE_URL` and `BIGO_API_TOKEN`.
    ///
    /// The base URL is mandatory. A missing token is not an error here: the
    /// request goes out with an empty bearer and the remote rejects it.
    pub fn from_env() -> std::result::Result<Self, String> {
        let base_url = std::env::var(BASE_URL_ENV)
            .map_err(|_| format!("missing {BASE_URL_ENV} environment variable"))?;
        if base_url.trim().is_empty() {
            return Err(format!("{BASE_URL_ENV} is set but empty"));
        }
        let token = std::env::var(TOKEN_ENV).unwrap_or_default();
        Ok(Self::new(base_url.trim(), token))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Value of the `Authorization` header sent with every request.
    pub fn authorization(&self) -> String {
        normalize_bearer_authorization(&self.token)
    }
}

fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_bearer_authorization, ClientConfig};

    #[test]
    fn normalize_bearer_adds_prefix_when_missing() {
        assert_eq!(normalize_bearer_authorization("abc123"), "Bearer abc123");
    }

    #[test]
    fn normalize_bearer_keeps_existing_prefix() {
        assert_eq!(
            normalize_bearer_authorization("bEaReR abc123"),
            "bEaReR abc123"
        );
    }

    #[test]
    fn empty_token_still_produces_bearer_header() {
        let config = ClientConfig::new("https://api.example", "");
        assert_eq!(config.authorization(), "Bearer ");
    }

    #[test]
    fn debug_redacts_token() {
        let config = ClientConfig::new("https://api.example", "secret-token");
        let debug = format!("{config:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret-token"));
    }
}
