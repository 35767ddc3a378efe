//! OAuth2 client glue
//!
//! [`OAuthClient`] configures an `oauth2` crate client from any
//! [`ProviderAdapter`] and runs the standard flows through it. Every endpoint
//! response is shown to the provider's response validator before the
//! framework parses it, so provider errors reported with a 200 status still
//! surface as [`OAuthError::IdentityProvider`].

use std::sync::OnceLock;

use http::header::{HeaderValue, ACCEPT};
use http::Method;
use oauth2::basic::BasicErrorResponse;
use oauth2::{
    AsyncHttpClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, HttpRequest,
    HttpResponse, PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, RefreshToken,
    RequestTokenError, Scope, TokenUrl,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{IdentityProviderError, OAuthError};
use crate::providers::{BearerToken, ProviderAdapter};
use crate::types::{AuthorizationRequest, ConfiguredClient, ProviderResponse, ProviderTokenResponse};

/// Failure inside the validating transport wrapper
#[derive(Debug, thiserror::Error)]
enum TransportError {
    #[error("HTTP transport failed: {0}")]
    Http(String),

    #[error(transparent)]
    Provider(#[from] IdentityProviderError),
}

/// OAuth2 client bound to one provider
pub struct OAuthClient<P: ProviderAdapter> {
    provider: P,
    client: ConfiguredClient,
}

impl<P: ProviderAdapter> OAuthClient<P> {
    /// Create a client for the given provider
    ///
    /// # Errors
    ///
    /// Returns error if any endpoint URL or the redirect URI is invalid
    pub fn new(provider: P) -> Result<Self, OAuthError> {
        let config = provider.config();

        let client: ConfiguredClient = oauth2::Client::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_type(provider.client_auth_type())
            .set_auth_uri(
                AuthUrl::new(provider.authorization_endpoint())
                    .map_err(|e| OAuthError::Configuration(format!("Invalid auth URL: {e}")))?,
            )
            .set_token_uri(
                TokenUrl::new(provider.token_endpoint())
                    .map_err(|e| OAuthError::Configuration(format!("Invalid token URL: {e}")))?,
            )
            .set_redirect_uri(
                RedirectUrl::new(config.redirect_uri.clone())
                    .map_err(|e| OAuthError::Configuration(format!("Invalid redirect URI: {e}")))?,
            );

        Ok(Self { provider, client })
    }

    /// The provider this client talks to
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Generate an authorization URL with the configured or default scopes
    #[must_use]
    pub fn authorization_url(&self) -> AuthorizationRequest {
        self.authorization_url_with(&[])
    }

    /// Generate an authorization URL requesting specific scopes
    ///
    /// Scopes are joined with the provider's separator into a single `scope`
    /// parameter. An empty slice falls back to the configured scopes, then to
    /// the provider defaults.
    #[must_use]
    pub fn authorization_url_with(&self, scopes: &[&str]) -> AuthorizationRequest {
        let config = self.provider.config();
        let scope = self
            .provider
            .encode_scopes(&self.provider.resolve_scopes(scopes));

        let mut request = self.client.authorize_url(CsrfToken::new_random);

        if !scope.is_empty() {
            request = request.add_scope(Scope::new(scope));
        }
        if let Some(access_type) = config.access_type {
            request = request.add_extra_param("access_type", access_type.as_str());
        }
        if let Some(prompt) = &config.prompt {
            request = request.add_extra_param("prompt", prompt.clone());
        }

        let pkce_verifier = if config.use_pkce {
            let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
            request = request.set_pkce_challenge(pkce_challenge);
            Some(pkce_verifier.secret().clone())
        } else {
            None
        };

        let (auth_url, csrf_state) = request.url();
        debug!(url = %auth_url, pkce = pkce_verifier.is_some(), "generated authorization URL");

        AuthorizationRequest {
            url: auth_url.to_string(),
            csrf_state: csrf_state.secret().clone(),
            pkce_verifier,
        }
    }

    /// Exchange an authorization code for an access token
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::IdentityProvider`] if the provider reports an
    /// error, or [`OAuthError::TokenExchangeFailed`] if the request or the
    /// response parsing fails
    pub async fn exchange_code<'c, C>(
        &self,
        http_client: &'c C,
        code: &str,
        pkce_verifier: Option<&str>,
    ) -> Result<P::Token, OAuthError>
    where
        C: AsyncHttpClient<'c> + Sync,
    {
        let mut request = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()));
        if let Some(verifier) = pkce_verifier {
            request = request.set_pkce_verifier(PkceCodeVerifier::new(verifier.to_string()));
        }

        let raw = OnceLock::new();
        let validating = |request: HttpRequest| self.send_validated(http_client, request, &raw);
        let response = request
            .request_async(&validating)
            .await
            .map_err(token_error)?;

        self.create_token(raw.into_inner(), &response)
    }

    /// Exchange a refresh token for a new access token
    ///
    /// # Errors
    ///
    /// Same as [`OAuthClient::exchange_code`]
    pub async fn refresh_token<'c, C>(
        &self,
        http_client: &'c C,
        refresh_token: &str,
    ) -> Result<P::Token, OAuthError>
    where
        C: AsyncHttpClient<'c> + Sync,
    {
        let refresh_token = RefreshToken::new(refresh_token.to_string());

        let raw = OnceLock::new();
        let validating = |request: HttpRequest| self.send_validated(http_client, request, &raw);
        let response = self
            .client
            .exchange_refresh_token(&refresh_token)
            .request_async(&validating)
            .await
            .map_err(token_error)?;

        self.create_token(raw.into_inner(), &response)
    }

    /// Fetch the resource owner using an access token
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::IdentityProvider`] if the provider reports an
    /// error, or [`OAuthError::UserInfoFailed`] if the request fails, the
    /// status is not successful or the body is not a JSON object
    pub async fn fetch_resource_owner<'c, C>(
        &self,
        http_client: &'c C,
        token: &P::Token,
    ) -> Result<P::User, OAuthError>
    where
        C: AsyncHttpClient<'c> + Sync,
    {
        let url = self.provider.resource_owner_endpoint(token);
        let (auth_name, auth_value) = self.provider.authorization_header(token.bearer())?;

        let request = http::Request::builder()
            .method(Method::GET)
            .uri(url.as_str())
            .header(auth_name, auth_value)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .body(Vec::new())
            .map_err(|e| OAuthError::UserInfoFailed(e.to_string()))?;

        debug!(%url, "fetching resource owner");

        let response = http_client
            .call(request)
            .await
            .map_err(|e| OAuthError::UserInfoFailed(e.to_string()))?;

        let body: Value = serde_json::from_slice(response.body())
            .map_err(|e| OAuthError::UserInfoFailed(format!("Failed to parse JSON: {e}")))?;
        let response = ProviderResponse::new(response.status(), response.headers().clone(), body);

        self.provider.check_response(&response)?;

        if !response.status().is_success() {
            return Err(OAuthError::UserInfoFailed(format!("HTTP {}", response.status())));
        }

        match response.into_body() {
            Value::Object(fields) => Ok(self.provider.create_resource_owner(fields, token)),
            other => Err(OAuthError::UserInfoFailed(format!(
                "Expected a JSON object, got {other}"
            ))),
        }
    }

    /// Send a request and run the provider's validator on the response
    ///
    /// A JSON object body that passes validation is stored in `raw` as received.
    async fn send_validated<'c, C>(
        &self,
        http_client: &'c C,
        request: HttpRequest,
        raw: &OnceLock<Map<String, Value>>,
    ) -> Result<HttpResponse, TransportError>
    where
        C: AsyncHttpClient<'c> + Sync,
    {
        debug!(uri = %request.uri(), "sending token request");

        let response = http_client
            .call(request)
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        if let Some(view) = ProviderResponse::from_http(&response) {
            self.provider.check_response(&view)?;
            if let Value::Object(fields) = view.into_body() {
                let _ = raw.set(fields);
            }
        }

        Ok(response)
    }

    /// Build the provider token from the raw response body
    ///
    /// Falls back to the framework's parsed response when no raw body was kept.
    fn create_token(
        &self,
        raw: Option<Map<String, Value>>,
        response: &ProviderTokenResponse,
    ) -> Result<P::Token, OAuthError> {
        if let Some(fields) = raw {
            return self.provider.create_access_token(fields);
        }

        match serde_json::to_value(response) {
            Ok(Value::Object(fields)) => self.provider.create_access_token(fields),
            Ok(other) => Err(OAuthError::InvalidTokenResponse(format!(
                "Expected a JSON object, got {other}"
            ))),
            Err(e) => Err(OAuthError::InvalidTokenResponse(e.to_string())),
        }
    }
}

fn token_error(err: RequestTokenError<TransportError, BasicErrorResponse>) -> OAuthError {
    match err {
        RequestTokenError::Request(TransportError::Provider(e)) => OAuthError::IdentityProvider(e),
        RequestTokenError::Request(e) => OAuthError::TokenExchangeFailed(e.to_string()),
        RequestTokenError::ServerResponse(response) => {
            OAuthError::TokenExchangeFailed(format!("Token endpoint rejected the request: {response}"))
        }
        RequestTokenError::Parse(e, _) => {
            OAuthError::TokenExchangeFailed(format!("Failed to parse token response: {e}"))
        }
        RequestTokenError::Other(message) => OAuthError::TokenExchangeFailed(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccessType, ProviderConfig};
    use crate::providers::ZohoProvider;
    use oauth2::basic::BasicErrorResponseType;
    use oauth2::url::Url;

    fn client(config: ProviderConfig) -> OAuthClient<ZohoProvider> {
        OAuthClient::new(ZohoProvider::new(config).unwrap()).unwrap()
    }

    fn config() -> ProviderConfig {
        ProviderConfig::new(
            "test-client-id",
            "test-client-secret",
            "http://localhost:3000/auth/zoho/callback",
        )
    }

    fn query(url: &str, key: &str) -> Option<String> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.into_owned())
    }

    #[test]
    fn test_authorization_url_generation() {
        let auth = client(config().region("EU")).authorization_url();

        assert!(auth.url().starts_with("https://accounts.zoho.com/oauth/v2/auth?"));
        assert_eq!(query(&auth.url, "client_id").as_deref(), Some("test-client-id"));
        assert_eq!(query(&auth.url, "response_type").as_deref(), Some("code"));
        assert_eq!(
            query(&auth.url, "redirect_uri").as_deref(),
            Some("http://localhost:3000/auth/zoho/callback")
        );
        assert_eq!(query(&auth.url, "scope").as_deref(), Some("aaaserver.profile.READ"));
        assert_eq!(query(&auth.url, "state").as_deref(), Some(auth.csrf_state.as_str()));
        assert!(query(&auth.url, "code_challenge").is_none());
        assert!(auth.pkce_verifier.is_none());
    }

    #[test]
    fn test_authorization_url_for_cn() {
        let auth = client(config().region("CN")).authorization_url();
        assert!(auth.url().starts_with("https://accounts.zoho.com.cn/oauth/v2/auth?"));
    }

    #[test]
    fn test_authorization_url_joins_scopes_with_commas() {
        let auth = client(config())
            .authorization_url_with(&["ZohoCRM.modules.ALL", "ZohoCRM.settings.ALL"]);

        assert_eq!(
            query(&auth.url, "scope").as_deref(),
            Some("ZohoCRM.modules.ALL,ZohoCRM.settings.ALL")
        );
        assert!(auth.url().contains("scope=ZohoCRM.modules.ALL%2CZohoCRM.settings.ALL"));
    }

    #[test]
    fn test_authorization_url_with_pkce_and_offline_access() {
        let auth = client(
            config()
                .pkce(true)
                .access_type(AccessType::Offline)
                .prompt("consent"),
        )
        .authorization_url();

        assert!(auth.pkce_verifier.is_some());
        assert!(query(&auth.url, "code_challenge").is_some());
        assert_eq!(query(&auth.url, "code_challenge_method").as_deref(), Some("S256"));
        assert_eq!(query(&auth.url, "access_type").as_deref(), Some("offline"));
        assert_eq!(query(&auth.url, "prompt").as_deref(), Some("consent"));
    }

    #[test]
    fn test_invalid_redirect_uri_is_rejected() {
        let err = OAuthClient::new(
            ZohoProvider::new(ProviderConfig::new("id", "secret", "not a url")).unwrap(),
        )
        .err()
        .unwrap();

        assert!(matches!(err, OAuthError::Configuration(ref msg) if msg.contains("redirect URI")));
    }

    #[test]
    fn test_client_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ZohoProvider>();
        assert_send_sync::<OAuthClient<ZohoProvider>>();
    }

    #[test]
    fn test_token_error_mapping() {
        let response = ProviderResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            serde_json::json!({"error": "invalid_code"}),
        );
        let provider_error = IdentityProviderError::new("invalid_code", response);

        let err = token_error(RequestTokenError::Request(TransportError::Provider(provider_error)));
        assert!(matches!(err, OAuthError::IdentityProvider(ref e) if e.error() == "invalid_code"));

        let err = token_error(RequestTokenError::Request(TransportError::Http("boom".into())));
        assert!(matches!(err, OAuthError::TokenExchangeFailed(ref msg) if msg.contains("boom")));

        let rejected = BasicErrorResponse::new(
            BasicErrorResponseType::InvalidGrant,
            Some("code expired".to_string()),
            None,
        );
        let err = token_error(RequestTokenError::ServerResponse(rejected));
        assert!(matches!(
            err,
            OAuthError::TokenExchangeFailed(ref msg)
                if msg.contains("invalid_grant") && msg.contains("code expired")
        ));

        let err = token_error(RequestTokenError::Other(
            "Unexpected response Content-Type: text/html".to_string(),
        ));
        assert!(matches!(err, OAuthError::TokenExchangeFailed(ref msg) if msg.contains("text/html")));
    }
}
