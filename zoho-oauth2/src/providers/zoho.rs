//! Zoho Accounts provider implementation
//!
//! Zoho requires the data-center specific accounts domain when generating
//! access and refresh tokens. Authorization itself is served from the US
//! domain for every data center except China.

use oauth2::AuthType;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::adapter::ProviderAdapter;
use crate::config::ProviderConfig;
use crate::error::{IdentityProviderError, OAuthError};
use crate::region::Region;
use crate::token::ZohoAccessToken;
use crate::types::ProviderResponse;
use crate::user::ZohoUser;

/// Scope used when none is requested; grants read access to the basic profile
pub const DEFAULT_SCOPE: &str = "aaaserver.profile.READ";

/// Profile endpoint; profile lookups always go to the US domain
pub const RESOURCE_OWNER_URL: &str = "https://accounts.zoho.com/oauth/user/info";

const AUTHORIZATION_PATH: &str = "/oauth/v2/auth";
const TOKEN_PATH: &str = "/oauth/v2/token";

/// Zoho OAuth2 provider
#[derive(Debug, Clone)]
pub struct ZohoProvider {
    config: ProviderConfig,
    region: Option<Region>,
}

impl ZohoProvider {
    /// Create a new Zoho OAuth2 provider
    ///
    /// An unrecognised region code is logged and treated as unset.
    ///
    /// # Errors
    ///
    /// Returns error if the client credentials are missing
    pub fn new(config: ProviderConfig) -> Result<Self, OAuthError> {
        config.validate()?;

        let region = config
            .region
            .as_deref()
            .and_then(|code| match code.parse::<Region>() {
                Ok(region) => Some(region),
                Err(e) => {
                    warn!(error = %e, "falling back to the default Zoho data center");
                    None
                }
            });

        Ok(Self { config, region })
    }

    /// Configured data center, if the code was recognised
    #[must_use]
    pub const fn region(&self) -> Option<Region> {
        self.region
    }

    /// Data center serving the authorization endpoint
    ///
    /// Only `CN` has a separate authorization domain.
    #[must_use]
    pub const fn authorization_region(&self) -> Region {
        match self.region {
            Some(Region::Cn) => Region::Cn,
            _ => Region::Us,
        }
    }

    /// Data center serving the token endpoint
    #[must_use]
    pub fn token_region(&self) -> Region {
        self.region.unwrap_or_default()
    }
}

impl ProviderAdapter for ZohoProvider {
    type Token = ZohoAccessToken;
    type User = ZohoUser;

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn authorization_endpoint(&self) -> String {
        let url = format!("{}{AUTHORIZATION_PATH}", self.authorization_region().domain());
        debug!(%url, "resolved Zoho authorization endpoint");
        url
    }

    fn token_endpoint(&self) -> String {
        let url = format!("{}{TOKEN_PATH}", self.token_region().domain());
        debug!(%url, "resolved Zoho token endpoint");
        url
    }

    fn resource_owner_endpoint(&self, _token: &ZohoAccessToken) -> String {
        RESOURCE_OWNER_URL.to_string()
    }

    fn default_scopes(&self) -> Vec<String> {
        vec![DEFAULT_SCOPE.to_string()]
    }

    fn scope_separator(&self) -> &'static str {
        ","
    }

    // Zoho reads client_id and client_secret from the form body
    fn client_auth_type(&self) -> AuthType {
        AuthType::RequestBody
    }

    fn check_response(&self, response: &ProviderResponse) -> Result<(), IdentityProviderError> {
        let Some(error) = response.body().get("error").filter(|value| !is_empty(value)) else {
            return Ok(());
        };

        let error = match error {
            Value::String(message) => message.clone(),
            other => other.to_string(),
        };
        warn!(status = %response.status(), %error, "Zoho returned an error response");

        Err(IdentityProviderError::new(error, response.clone()))
    }

    fn create_access_token(&self, response: Map<String, Value>) -> Result<ZohoAccessToken, OAuthError> {
        ZohoAccessToken::from_response(response)
    }

    fn create_resource_owner(&self, response: Map<String, Value>, _token: &ZohoAccessToken) -> ZohoUser {
        ZohoUser::new(response)
    }
}

/// Values Zoho uses for "no error"
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}
