//! zoho-oauth2: Zoho Accounts support for the `oauth2` crate
//!
//! Zoho runs separate accounts domains per data center (US, AU, EU, IN, CN).
//! This crate resolves the right endpoints for a configured region, joins
//! scopes the way Zoho expects, validates every response for Zoho's `error`
//! field and exposes the raw token and profile data.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use zoho_oauth2::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ProviderConfig::new(
//!         "1000.CLIENTID",
//!         "client-secret",
//!         "http://localhost:3000/auth/zoho/callback",
//!     )
//!     .region("EU");
//!
//!     let client = OAuthClient::new(ZohoProvider::new(config)?)?;
//!
//!     // Redirect the user here and keep csrf_state for the callback
//!     let auth = client.authorization_url();
//!     println!("{}", auth.url());
//!
//!     let token = client
//!         .exchange_code(&async_http_client, "code-from-callback", None)
//!         .await?;
//!     let user = client.fetch_resource_owner(&async_http_client, &token).await?;
//!
//!     println!("{:?} via {:?}", user.email(), token.api_domain());
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! [`ProviderConfig::load`] reads `./zoho.toml`, the per-user config file and
//! `ZOHO_` prefixed environment variables.

// Lint configuration is handled at the workspace level in Cargo.toml

pub mod client;
pub mod config;
pub mod error;
pub mod observability;
pub mod providers;
pub mod region;
pub mod token;
pub mod transport;
pub mod types;
pub mod user;

pub use client::OAuthClient;
pub use config::{AccessType, ProviderConfig};
pub use error::{IdentityProviderError, OAuthError};
pub use providers::{BearerToken, ProviderAdapter, ZohoProvider};
pub use region::Region;
pub use token::ZohoAccessToken;
pub use transport::async_http_client;
pub use types::{AuthorizationRequest, ProviderResponse};
pub use user::ZohoUser;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! # Examples
    //!
    //! ```rust
    //! use zoho_oauth2::prelude::*;
    //! ```

    pub use crate::client::OAuthClient;
    pub use crate::config::{AccessType, ProviderConfig};
    pub use crate::error::{IdentityProviderError, OAuthError};
    pub use crate::providers::{BearerToken, ProviderAdapter, ZohoProvider};
    pub use crate::region::Region;
    pub use crate::token::ZohoAccessToken;
    pub use crate::transport::async_http_client;
    pub use crate::types::AuthorizationRequest;
    pub use crate::user::ZohoUser;
}
