//! HTTP snapshot driver
//!
//! Fetches pages with a configured reqwest client and serves element
//! queries from the fetched document. This is the default [`Browser`]
//! implementation; anything speaking the driver traits can replace it.

use crate::driver::{Browser, DriverError, DriverResult, Element, HtmlElement, Page};
use crate::marketplace::Country;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// A realistic desktop browser profile, which reduces basic bot detection
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Builds an HTTP client configured for a marketplace locale
///
/// # Arguments
///
/// * `locale` - The marketplace locale, sent as Accept-Language
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(locale: &str) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    let accept_language = format!("{},en;q=0.8", locale);
    if let Ok(value) = HeaderValue::from_str(&accept_language) {
        headers.insert(ACCEPT_LANGUAGE, value);
    }

    Client::builder()
        .user_agent(DESKTOP_USER_AGENT)
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// HTTP-backed browser session
///
/// Holds the one client shared across all keywords; each page scope opened
/// from it carries its own document snapshot.
pub struct HttpBrowser {
    client: Client,
}

impl HttpBrowser {
    /// Creates a session configured for the given marketplace
    pub fn new(country: Country) -> DriverResult<Self> {
        let client = build_http_client(country.locale()).map_err(|e| DriverError::Navigation {
            url: country.origin().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { client })
    }

    /// Creates a session from an already-configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn open_page(&self) -> DriverResult<Box<dyn Page>> {
        Ok(Box::new(HttpPage {
            client: self.client.clone(),
            body: None,
        }))
    }
}

/// One page scope over the HTTP driver
struct HttpPage {
    client: Client,
    body: Option<String>,
}

#[async_trait]
impl Page for HttpPage {
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> DriverResult<()> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_send_error(url, timeout, e))?;

        // Interdiction pages are served with error statuses (503 and
        // friends) but still carry a body the block detector must see, so
        // a non-success status is not a navigation failure here.
        let body = response
            .text()
            .await
            .map_err(|e| classify_send_error(url, timeout, e))?;

        self.body = Some(body);
        Ok(())
    }

    async fn content(&self) -> DriverResult<String> {
        self.body.clone().ok_or(DriverError::NoContent)
    }

    async fn query_all(&self, selector: &str) -> DriverResult<Vec<Box<dyn Element>>> {
        let body = self.body.as_deref().ok_or(DriverError::NoContent)?;
        let matches = HtmlElement::select_in_document(body, selector)?;
        Ok(matches
            .into_iter()
            .map(|el| Box::new(el) as Box<dyn Element>)
            .collect())
    }

    async fn close(&mut self) {
        self.body = None;
    }
}

fn classify_send_error(url: &Url, timeout: Duration, error: reqwest::Error) -> DriverError {
    if error.is_timeout() {
        DriverError::Timeout {
            url: url.to_string(),
            timeout,
        }
    } else {
        DriverError::Navigation {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
