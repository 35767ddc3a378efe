//! Zoho access token
//!
//! Wraps the `oauth2` crate's standard token response and keeps the raw
//! response map next to it, so provider extensions such as `api_domain`
//! remain reachable.

use std::time::{Duration, SystemTime};

use oauth2::basic::BasicTokenType;
use oauth2::TokenResponse;
use serde_json::{Map, Value};

use crate::error::OAuthError;
use crate::providers::BearerToken;
use crate::types::ProviderTokenResponse;

/// Access token issued by Zoho Accounts
#[derive(Debug, Clone)]
pub struct ZohoAccessToken {
    response: ProviderTokenResponse,
    values: Map<String, Value>,
    expires_at: Option<SystemTime>,
}

impl ZohoAccessToken {
    /// Build a token from a raw token endpoint response
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidTokenResponse`] if `access_token` or
    /// `token_type` is missing or malformed
    pub fn from_response(values: Map<String, Value>) -> Result<Self, OAuthError> {
        let response: ProviderTokenResponse =
            serde_json::from_value(Value::Object(values.clone()))
                .map_err(|e| OAuthError::InvalidTokenResponse(e.to_string()))?;

        let expires_at = response
            .expires_in()
            .map(|duration| SystemTime::now() + duration);

        Ok(Self {
            response,
            values,
            expires_at,
        })
    }

    /// Access token string
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.response.access_token().secret()
    }

    /// Token type (Zoho issues `Bearer` tokens)
    #[must_use]
    pub fn token_type(&self) -> &BasicTokenType {
        self.response.token_type()
    }

    /// Refresh token, present when `access_type=offline` was requested
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.response
            .refresh_token()
            .map(|token| token.secret().as_str())
    }

    /// Lifetime reported by the token endpoint
    #[must_use]
    pub fn expires_in(&self) -> Option<Duration> {
        self.response.expires_in()
    }

    /// When the token expires, computed when the response was received
    #[must_use]
    pub const fn expires_at(&self) -> Option<SystemTime> {
        self.expires_at
    }

    /// Check if the access token has expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires| SystemTime::now() > expires)
    }

    /// Scopes granted, if the response lists them
    #[must_use]
    pub fn scopes(&self) -> Option<Vec<String>> {
        self.response
            .scopes()
            .map(|scopes| scopes.iter().map(|scope| scope.to_string()).collect())
    }

    /// API domain for the account's data center (e.g. `https://www.zohoapis.eu`)
    #[must_use]
    pub fn api_domain(&self) -> Option<&str> {
        self.values.get("api_domain").and_then(Value::as_str)
    }

    /// Look up any field of the raw response
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// All fields of the raw response
    #[must_use]
    pub const fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// The standard token response parsed by the `oauth2` crate
    #[must_use]
    pub const fn token_response(&self) -> &ProviderTokenResponse {
        &self.response
    }
}

impl BearerToken for ZohoAccessToken {
    fn bearer(&self) -> &str {
        self.access_token()
    }
}
