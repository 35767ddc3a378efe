//! Zoho data centers
//!
//! Zoho hosts accounts in separate data centers, and each data center has its
//! own accounts domain. Access and refresh tokens must be requested from the
//! domain of the data center the account lives in.
//!
//! See <https://www.zoho.com/crm/developer/docs/api/multi-dc.html>.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OAuthError;

/// Zoho data center identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    /// United States, the default data center
    #[default]
    #[serde(rename = "US")]
    Us,
    /// Australia
    #[serde(rename = "AU")]
    Au,
    /// European Union
    #[serde(rename = "EU")]
    Eu,
    /// India
    #[serde(rename = "IN")]
    In,
    /// China
    #[serde(rename = "CN")]
    Cn,
}

impl Region {
    /// Every known data center
    pub const ALL: [Self; 5] = [Self::Us, Self::Au, Self::Eu, Self::In, Self::Cn];

    /// Get the region code (upper case)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Au => "AU",
            Self::Eu => "EU",
            Self::In => "IN",
            Self::Cn => "CN",
        }
    }

    /// Accounts domain of the data center
    #[must_use]
    pub const fn domain(&self) -> &'static str {
        match self {
            Self::Us => "https://accounts.zoho.com",
            Self::Au => "https://accounts.zoho.com.au",
            Self::Eu => "https://accounts.zoho.eu",
            Self::In => "https://accounts.zoho.in",
            Self::Cn => "https://accounts.zoho.com.cn",
        }
    }
}

impl FromStr for Region {
    type Err = OAuthError;

    /// Codes are matched exactly; `"eu"` is not a region.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "US" => Ok(Self::Us),
            "AU" => Ok(Self::Au),
            "EU" => Ok(Self::Eu),
            "IN" => Ok(Self::In),
            "CN" => Ok(Self::Cn),
            _ => Err(OAuthError::UnknownRegion(s.to_string())),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_domains() {
        assert_eq!(Region::Us.domain(), "https://accounts.zoho.com");
        assert_eq!(Region::Au.domain(), "https://accounts.zoho.com.au");
        assert_eq!(Region::Eu.domain(), "https://accounts.zoho.eu");
        assert_eq!(Region::In.domain(), "https://accounts.zoho.in");
        assert_eq!(Region::Cn.domain(), "https://accounts.zoho.com.cn");
    }

    #[test]
    fn test_region_from_str() {
        for region in Region::ALL {
            assert_eq!(region.as_str().parse::<Region>().unwrap(), region);
            assert_eq!(region.to_string(), region.as_str());
        }
        assert!(matches!(
            "eu".parse::<Region>(),
            Err(OAuthError::UnknownRegion(code)) if code == "eu"
        ));
        assert!("".parse::<Region>().is_err());
        assert!("JP".parse::<Region>().is_err());
    }

    #[test]
    fn test_region_default_is_us() {
        assert_eq!(Region::default(), Region::Us);
    }

    #[test]
    fn test_region_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Region::Cn).unwrap(), "\"CN\"");
        assert_eq!(
            serde_json::from_str::<Region>("\"AU\"").unwrap(),
            Region::Au
        );
    }
}
