//! Page-automation driver seam
//!
//! The crawler depends on a narrow capability interface: open a page scope,
//! navigate it with an explicit timeout, read its content, and query
//! elements by CSS selector. Extraction logic only ever sees these traits,
//! never a concrete driver.
//!
//! The bundled adapter ([`HttpBrowser`]) fetches pages over HTTP and backs
//! element handles with parsed HTML snapshots.

mod element;
mod http;

pub use element::HtmlElement;
pub use http::{build_http_client, HttpBrowser, DESKTOP_USER_AGENT};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors surfaced by a page driver
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Page has no content; navigate it first")]
    NoContent,
}

impl DriverError {
    /// Returns true if this error is a navigation timeout, the one
    /// condition the crawler retries
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// A browser-like session from which page scopes are opened
///
/// One session is shared across all keywords; every navigation gets its own
/// scoped page, opened and closed around its unit of work.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Opens a fresh page scope
    async fn open_page(&self) -> DriverResult<Box<dyn Page>>;
}

/// One page scope
#[async_trait]
pub trait Page: Send {
    /// Navigates to the URL, bounded by the given timeout
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> DriverResult<()>;

    /// Returns the rendered page content
    async fn content(&self) -> DriverResult<String>;

    /// Queries the page for all elements matching a CSS selector
    async fn query_all(&self, selector: &str) -> DriverResult<Vec<Box<dyn Element>>>;

    /// Releases the page scope
    ///
    /// Callers invoke this on every exit path of the per-page block.
    async fn close(&mut self);
}

/// A handle to one element within a page
#[async_trait]
pub trait Element: Send + Sync {
    /// Reads an attribute value
    async fn attr(&self, name: &str) -> DriverResult<Option<String>>;

    /// Reads the element's text content, trimmed
    async fn text(&self) -> DriverResult<String>;

    /// Queries descendants matching a CSS selector
    async fn query_all(&self, selector: &str) -> DriverResult<Vec<Box<dyn Element>>>;

    /// Counts descendants matching a CSS selector
    async fn count(&self, selector: &str) -> DriverResult<usize> {
        Ok(self.query_all(selector).await?.len())
    }

    /// Returns the first descendant matching a CSS selector, if any
    async fn first(&self, selector: &str) -> DriverResult<Option<Box<dyn Element>>> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }
}
