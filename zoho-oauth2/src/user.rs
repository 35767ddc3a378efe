//! Zoho resource owner

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile returned by the Zoho user info endpoint
///
/// The raw response is kept as-is. Lookups return `None` for absent keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZohoUser {
    response: Map<String, Value>,
}

impl ZohoUser {
    /// Wrap a raw profile response
    #[must_use]
    pub const fn new(response: Map<String, Value>) -> Self {
        Self { response }
    }

    /// Look up a field of the profile
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.response.get(key)
    }

    /// Look up a string field of the profile
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Zoho user ID (`ZUID`, falling back to `id`)
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.get("ZUID")
            .or_else(|| self.get("id"))
            .and_then(scalar_to_string)
    }

    /// Primary email address (`Email`, falling back to `email`)
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.get_str("Email").or_else(|| self.get_str("email"))
    }

    /// Display name
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.get_str("Display_Name")
    }

    /// First name
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.get_str("First_Name")
    }

    /// Last name
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.get_str("Last_Name")
    }

    /// Borrow the raw profile
    #[must_use]
    pub const fn to_map(&self) -> &Map<String, Value> {
        &self.response
    }

    /// Consume the user, returning the raw profile
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.response
    }
}

// ZUID comes back as a number from user/info and as a string elsewhere
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
