//! Core OAuth2 types
//!
//! This module defines the types shared between the provider adapter and the
//! `oauth2` client glue: the configured client type, the token response shape
//! that keeps provider-specific fields, and the response view handed to
//! response validators.

use http::{HeaderMap, StatusCode};
use oauth2::basic::{
    BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
    BasicTokenType,
};
use oauth2::{
    Client, EndpointNotSet, EndpointSet, ExtraTokenFields, HttpResponse, StandardRevocableToken,
    StandardTokenResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Token response fields beyond the ones defined by RFC 6749
///
/// Every field the framework does not know about lands here, so provider
/// extensions such as Zoho's `api_domain` survive the code exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassthroughFields {
    /// Non-standard fields, keyed by their JSON name
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ExtraTokenFields for PassthroughFields {}

/// Token response as parsed by the `oauth2` crate
pub type ProviderTokenResponse = StandardTokenResponse<PassthroughFields, BasicTokenType>;

/// Type alias for a configured OAuth2 client with auth and token endpoints set
///
/// The type parameters indicate which endpoints are configured:
/// - `EndpointSet` for `HasAuthUrl` - Authorization endpoint is configured
/// - `EndpointNotSet` for `HasDeviceAuthUrl` - Device auth not used
/// - `EndpointNotSet` for `HasIntrospectionUrl` - Token introspection not used
/// - `EndpointNotSet` for `HasRevocationUrl` - Token revocation not used
/// - `EndpointSet` for `HasTokenUrl` - Token exchange endpoint is configured
pub type ConfiguredClient = Client<
    BasicErrorResponse,
    ProviderTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointSet,    // HasAuthUrl
    EndpointNotSet, // HasDeviceAuthUrl
    EndpointNotSet, // HasIntrospectionUrl
    EndpointNotSet, // HasRevocationUrl
    EndpointSet,    // HasTokenUrl
>;

/// Endpoint response handed to response validators
///
/// Holds the transport status and headers together with the parsed JSON
/// body.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl ProviderResponse {
    /// Create a response view from its parts
    #[must_use]
    pub const fn new(status: StatusCode, headers: HeaderMap, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Build a response view from a raw transport response
    ///
    /// Returns `None` when the body is not JSON; such responses are left for
    /// the framework to reject.
    #[must_use]
    pub fn from_http(response: &HttpResponse) -> Option<Self> {
        let body = serde_json::from_slice(response.body()).ok()?;
        Some(Self::new(response.status(), response.headers().clone(), body))
    }

    /// HTTP status code
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Parsed JSON body
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Consume the response, returning the parsed body
    #[must_use]
    pub fn into_body(self) -> Value {
        self.body
    }
}

/// Authorization request ready to send to the user agent
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// The authorization URL to redirect the user to
    pub url: String,
    /// CSRF state token (store this to verify the callback)
    pub csrf_state: String,
    /// PKCE verifier (store this for the token exchange, if PKCE is enabled)
    pub pkce_verifier: Option<String>,
}

impl AuthorizationRequest {
    /// Get just the authorization URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oauth2::TokenResponse;
    use serde_json::json;

    #[test]
    fn test_passthrough_fields_keep_extensions() {
        let response: ProviderTokenResponse = serde_json::from_value(json!({
            "access_token": "1000.abc",
            "token_type": "Bearer",
            "expires_in": 3600,
            "api_domain": "https://www.zohoapis.eu"
        }))
        .unwrap();

        assert_eq!(response.access_token().secret(), "1000.abc");
        assert_eq!(
            response.extra_fields().fields.get("api_domain"),
            Some(&json!("https://www.zohoapis.eu"))
        );
        assert!(!response.extra_fields().fields.contains_key("access_token"));
    }

    #[test]
    fn test_provider_response_from_http() {
        let response = http::Response::builder()
            .status(400)
            .header("content-type", "application/json")
            .body(br#"{"error":"invalid_client"}"#.to_vec())
            .unwrap();

        let view = ProviderResponse::from_http(&response).unwrap();
        assert_eq!(view.status(), StatusCode::BAD_REQUEST);
        assert_eq!(view.body()["error"], "invalid_client");
        assert_eq!(view.headers()["content-type"], "application/json");
    }

    #[test]
    fn test_provider_response_from_non_json_body() {
        let response = http::Response::builder()
            .status(502)
            .body(b"<html>Bad Gateway</html>".to_vec())
            .unwrap();

        assert!(ProviderResponse::from_http(&response).is_none());
    }
}
