//! Provider capability trait
//!
//! [`ProviderAdapter`] is the seam between a specific identity provider and
//! the generic OAuth2 glue in [`crate::client`]. A provider supplies its
//! endpoints, scope conventions, response validation and the typed token and
//! user it builds from raw responses; the glue drives the `oauth2` crate.

use http::header::{HeaderName, HeaderValue, AUTHORIZATION};
use oauth2::AuthType;
use serde_json::{Map, Value};

use crate::config::ProviderConfig;
use crate::error::{IdentityProviderError, OAuthError};
use crate::types::ProviderResponse;

/// Access token that can be presented as a bearer credential
pub trait BearerToken {
    /// The raw access token string
    fn bearer(&self) -> &str;
}

/// Capabilities an identity provider exposes to the OAuth2 glue
pub trait ProviderAdapter: Send + Sync {
    /// Token type built from a token endpoint response
    type Token: BearerToken + Send + Sync;
    /// User type built from a resource owner response
    type User;

    /// Client configuration the provider was built from
    fn config(&self) -> &ProviderConfig;

    /// URL the user agent is redirected to for authorization
    fn authorization_endpoint(&self) -> String;

    /// URL used to exchange a code or refresh token for an access token
    fn token_endpoint(&self) -> String;

    /// URL used to fetch the resource owner's profile
    fn resource_owner_endpoint(&self, token: &Self::Token) -> String;

    /// Scopes requested when neither the caller nor the configuration names any
    fn default_scopes(&self) -> Vec<String>;

    /// Separator used to join scopes into the `scope` parameter
    fn scope_separator(&self) -> &'static str {
        " "
    }

    /// How client credentials are sent to the token endpoint
    fn client_auth_type(&self) -> AuthType {
        AuthType::BasicAuth
    }

    /// Inspect an endpoint response for a provider error
    ///
    /// # Errors
    ///
    /// Returns [`IdentityProviderError`] when the response reports a failure
    fn check_response(&self, response: &ProviderResponse) -> Result<(), IdentityProviderError>;

    /// Build a token from a validated token endpoint response
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidTokenResponse`] if the response lacks the
    /// standard token fields
    fn create_access_token(&self, response: Map<String, Value>) -> Result<Self::Token, OAuthError>;

    /// Build a user from a validated resource owner response
    fn create_resource_owner(&self, response: Map<String, Value>, token: &Self::Token)
        -> Self::User;

    /// Pick the scopes for an authorization request
    ///
    /// Explicit scopes win, then configured scopes, then the provider defaults.
    fn resolve_scopes(&self, requested: &[&str]) -> Vec<String> {
        if !requested.is_empty() {
            return requested.iter().map(|scope| (*scope).to_string()).collect();
        }

        let configured = &self.config().scopes;
        if configured.is_empty() {
            self.default_scopes()
        } else {
            configured.clone()
        }
    }

    /// Join scopes into a single `scope` parameter value
    fn encode_scopes(&self, scopes: &[String]) -> String {
        scopes.join(self.scope_separator())
    }

    /// Header carrying the access token on resource requests
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Configuration`] if the token contains characters
    /// that are not valid in a header value
    fn authorization_header(&self, token: &str) -> Result<(HeaderName, HeaderValue), OAuthError> {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| OAuthError::Configuration(format!("Invalid access token header: {e}")))?;
        Ok((AUTHORIZATION, value))
    }
}
