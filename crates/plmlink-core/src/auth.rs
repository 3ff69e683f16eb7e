//! Token minting.

use serde::Deserialize;
use tracing::debug;

use crate::config::ConnectorConfig;
use crate::endpoints;
use crate::error::{Error, Result};
use crate::transport::{AUTH_TIMEOUT, Transport};

/// An opaque bearer token minted by the backend.
///
/// In windowed mode a token is valid for exactly one fetch and is dropped
/// right after it; in snapshot mode it is reused until a fetch failure
/// drops it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// The raw token string, for URL segments and bearer headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

/// Mint a token from the backend's token endpoint.
///
/// Fails with [`Error::Auth`] when the endpoint does not answer with HTTP
/// success or the body has no `token` field. Never retried here; the next
/// poll authenticates afresh.
pub async fn authenticate(transport: &dyn Transport, config: &ConnectorConfig) -> Result<Token> {
    // The token URL carries credentials as query parameters; log only the host.
    debug!(base_url = %config.base_url, user = %config.username, "requesting access token");

    let url = endpoints::token_url(config);
    let body = transport
        .post(&url, AUTH_TIMEOUT)
        .await
        .map_err(|e| Error::auth(e.to_string()))?;

    let response: TokenResponse = serde_json::from_str(&body)
        .map_err(|_| Error::auth("token response has no usable token field"))?;
    if response.token.is_empty() {
        return Err(Error::auth("token response has no usable token field"));
    }

    debug!("access token acquired");
    Ok(Token(response.token))
}
