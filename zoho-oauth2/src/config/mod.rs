//! Provider configuration
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ZOHO_` prefix, `__` for nesting)
//! 2. `./zoho.toml` (development)
//! 3. `~/.config/zoho-oauth2/config.toml` (user config, XDG)
//! 4. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # zoho.toml
//! client_id = "1000.XXXXXXXXXXXXXXXXXXXXXXXXXXXXXX"
//! client_secret = "your-client-secret"
//! redirect_uri = "http://localhost:3000/auth/zoho/callback"
//! scopes = ["ZohoCRM.modules.ALL", "ZohoCRM.settings.ALL"]
//! region = "EU"
//! access_type = "offline"
//! prompt = "consent"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use zoho_oauth2::config::ProviderConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = ProviderConfig::load_from("./config/zoho.toml")?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::OAuthError;

/// Zoho `access_type` authorization parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    /// Access token only
    Online,
    /// Access token plus a refresh token
    Offline,
}

impl AccessType {
    /// Get the parameter value (lowercase)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

/// Configuration for the OAuth2 provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OAuth2 client ID
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// Redirect URI (callback URL)
    pub redirect_uri: String,
    /// OAuth2 scopes to request; the provider defaults apply when empty
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Data center code (`US`, `AU`, `EU`, `IN`, `CN`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Send a PKCE challenge with authorization requests
    #[serde(default)]
    pub use_pkce: bool,
    /// `access_type` authorization parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_type: Option<AccessType>,
    /// `prompt` authorization parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl ProviderConfig {
    /// Create a configuration from client credentials
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            ..Self::default()
        }
    }

    /// Set the data center code
    #[must_use]
    pub fn region(mut self, code: impl Into<String>) -> Self {
        self.region = Some(code.into());
        self
    }

    /// Set the scopes to request (replaces existing)
    #[must_use]
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable PKCE
    #[must_use]
    pub const fn pkce(mut self, enabled: bool) -> Self {
        self.use_pkce = enabled;
        self
    }

    /// Set the `access_type` authorization parameter
    #[must_use]
    pub const fn access_type(mut self, access_type: AccessType) -> Self {
        self.access_type = Some(access_type);
        self
    }

    /// Set the `prompt` authorization parameter
    #[must_use]
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Check that the client credentials are present
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Configuration`] naming the first empty field
    pub fn validate(&self) -> Result<(), OAuthError> {
        let required = [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", &self.redirect_uri),
        ];

        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(OAuthError::Configuration(format!("{name} must not be empty"))),
            None => Ok(()),
        }
    }

    /// Load configuration from the standard locations
    ///
    /// Searches with precedence:
    /// 1. Environment variables (`ZOHO_*`)
    /// 2. `./zoho.toml`
    /// 3. `~/.config/zoho-oauth2/config.toml`
    /// 4. Defaults
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - A configuration file cannot be read or parsed
    /// - Configuration values fail type conversion
    pub fn load() -> anyhow::Result<Self> {
        let mut figment = Self::defaults()?;

        let user_config = Self::recommended_path();
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from("./zoho.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        let config = figment.merge(Self::env()).extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Environment variables still override values from the file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - The file contains invalid TOML syntax
    /// - Configuration values fail type conversion
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config = Self::defaults()?
            .merge(Toml::file(path.as_ref()))
            .merge(Self::env())
            .extract()?;

        Ok(config)
    }

    /// Get the recommended XDG config path
    ///
    /// Returns `~/.config/zoho-oauth2/config.toml` on Linux.
    #[must_use]
    pub fn recommended_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./zoho.toml"),
            |config_dir| config_dir.join("zoho-oauth2").join("config.toml"),
        )
    }

    fn defaults() -> anyhow::Result<Figment> {
        Ok(Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?)))
    }

    fn env() -> Env {
        Env::prefixed("ZOHO_").split("__").lowercase(true)
    }
}
