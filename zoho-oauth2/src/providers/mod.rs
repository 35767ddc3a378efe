//! OAuth2 provider implementations
//!
//! - [`ProviderAdapter`]: the capability trait the client glue accepts
//! - [`ZohoProvider`]: Zoho Accounts, with data-center aware endpoints

pub mod adapter;
pub mod zoho;

pub use adapter::{BearerToken, ProviderAdapter};
pub use zoho::{ZohoProvider, DEFAULT_SCOPE, RESOURCE_OWNER_URL};
