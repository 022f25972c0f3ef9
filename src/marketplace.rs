//! Marketplace selection: country codes, origins, and locales
//!
//! Each supported country maps to a fixed Amazon origin and a browser
//! locale. Anything outside the supported set falls back to `US`.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Supported marketplace countries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "UK")]
    Uk,
    #[serde(rename = "DE")]
    De,
    #[serde(rename = "FR")]
    Fr,
    #[serde(rename = "JP")]
    Jp,
}

impl Country {
    /// Parses a country code, case-insensitively
    ///
    /// Returns None for anything outside the supported set; the input
    /// normalizer maps that to the `US` default.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "US" => Some(Self::Us),
            "UK" => Some(Self::Uk),
            "DE" => Some(Self::De),
            "FR" => Some(Self::Fr),
            "JP" => Some(Self::Jp),
            _ => None,
        }
    }

    /// Returns the two-letter country code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Uk => "UK",
            Self::De => "DE",
            Self::Fr => "FR",
            Self::Jp => "JP",
        }
    }

    /// Returns the marketplace host for this country
    pub fn origin(&self) -> &'static str {
        match self {
            Self::Us => "www.amazon.com",
            Self::Uk => "www.amazon.co.uk",
            Self::De => "www.amazon.de",
            Self::Fr => "www.amazon.fr",
            Self::Jp => "www.amazon.co.jp",
        }
    }

    /// Returns the browser locale for this marketplace, used as the
    /// Accept-Language sent with every request
    pub fn locale(&self) -> &'static str {
        match self {
            Self::Us => "en-US",
            Self::Uk => "en-GB",
            Self::De => "de-DE",
            Self::Fr => "fr-FR",
            Self::Jp => "ja-JP",
        }
    }

    /// Returns the HTTPS base URL of the marketplace
    pub fn base_url(&self) -> Url {
        // The origins above are fixed valid hosts, so this cannot fail.
        Url::parse(&format!("https://{}", self.origin()))
            .expect("marketplace origin is a valid URL")
    }

    /// Builds the search URL for a keyword on this marketplace
    pub fn search_url(&self, keyword: &str) -> Url {
        search_url_on(&self.base_url(), keyword)
    }

    /// Returns all supported countries
    pub fn all() -> Vec<Self> {
        vec![Self::Us, Self::Uk, Self::De, Self::Fr, Self::Jp]
    }
}

impl Default for Country {
    fn default() -> Self {
        Self::Us
    }
}

/// Builds a search URL on an arbitrary origin
///
/// The keyword lands percent-encoded in the `k` query parameter. Split out
/// from [`Country::search_url`] so the crawler can target an overridden
/// origin.
pub fn search_url_on(base_url: &Url, keyword: &str) -> Url {
    let mut url = base_url.clone();
    url.set_path("/s");
    url.query_pairs_mut().clear().append_pair("k", keyword);
    url
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
