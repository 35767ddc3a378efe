//! Error types and error handling

use http::StatusCode;
use thiserror::Error;

use crate::types::ProviderResponse;

/// Error reported by the identity provider in a response body
///
/// Zoho signals failures with an `error` field in the JSON body, frequently
/// alongside an HTTP 200 status. The full response is kept so callers can
/// branch on provider semantics or surface a message to the user.
#[derive(Debug, Clone, Error)]
#[error("Identity provider error (HTTP {status}): {error}")]
pub struct IdentityProviderError {
    error: String,
    status: StatusCode,
    response: ProviderResponse,
}

impl IdentityProviderError {
    /// Create an identity provider error from the offending response
    pub fn new(error: impl Into<String>, response: ProviderResponse) -> Self {
        Self {
            error: error.into(),
            status: response.status(),
            response,
        }
    }

    /// The value of the `error` field
    #[must_use]
    pub fn error(&self) -> &str {
        &self.error
    }

    /// HTTP status code of the response
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The complete response that carried the error
    #[must_use]
    pub const fn response(&self) -> &ProviderResponse {
        &self.response
    }
}

/// OAuth2 errors
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The provider answered with an `error` field
    #[error(transparent)]
    IdentityProvider(#[from] IdentityProviderError),

    /// Invalid client configuration
    #[error("Invalid OAuth2 configuration: {0}")]
    Configuration(String),

    /// Region code outside the known data centers
    #[error("Unknown Zoho region code: {0}")]
    UnknownRegion(String),

    /// Authorization code or refresh token exchange failed
    #[error("Failed to exchange authorization code for token: {0}")]
    TokenExchangeFailed(String),

    /// Token response is missing standard OAuth2 fields
    #[error("Invalid token response: {0}")]
    InvalidTokenResponse(String),

    /// Failed to fetch user info
    #[error("Failed to fetch user information: {0}")]
    UserInfoFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderMap;
    use serde_json::json;

    #[test]
    fn test_identity_provider_error_carries_response() {
        let response = ProviderResponse::new(
            StatusCode::BAD_REQUEST,
            HeaderMap::new(),
            json!({"error": "invalid_grant"}),
        );
        let err = IdentityProviderError::new("invalid_grant", response);

        assert_eq!(err.error(), "invalid_grant");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.response().body()["error"], "invalid_grant");
        assert_eq!(
            err.to_string(),
            "Identity provider error (HTTP 400 Bad Request): invalid_grant"
        );
    }

    #[test]
    fn test_oauth_error_from_identity_provider_error() {
        let response =
            ProviderResponse::new(StatusCode::OK, HeaderMap::new(), json!({"error": "invalid_code"}));
        let err: OAuthError = IdentityProviderError::new("invalid_code", response).into();

        assert!(matches!(err, OAuthError::IdentityProvider(ref e) if e.error() == "invalid_code"));
        assert!(err.to_string().contains("invalid_code"));
    }
}
