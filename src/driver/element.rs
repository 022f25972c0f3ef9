//! Snapshot-backed element handles
//!
//! [`HtmlElement`] owns the outer HTML of one element and answers the
//! narrow [`Element`] interface by parsing it as a fragment on demand.
//! Handles are self-contained, so they stay valid after their page scope
//! is closed.

use crate::driver::{DriverError, DriverResult, Element};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

/// An element handle backed by an owned HTML snapshot
#[derive(Debug, Clone)]
pub struct HtmlElement {
    outer_html: String,
}

impl HtmlElement {
    /// Creates a handle from an element's outer HTML
    pub fn new(outer_html: impl Into<String>) -> Self {
        Self {
            outer_html: outer_html.into(),
        }
    }

    /// Selects all matches of `selector` in a full document, returning one
    /// snapshot handle per match
    pub fn select_in_document(html: &str, selector: &str) -> DriverResult<Vec<HtmlElement>> {
        let parsed = parse_selector(selector)?;
        let document = Html::parse_document(html);
        Ok(document
            .select(&parsed)
            .map(|el| HtmlElement::new(el.html()))
            .collect())
    }

    /// Runs a closure against the root element of the parsed fragment
    fn with_root<T>(&self, f: impl FnOnce(ElementRef<'_>) -> T) -> DriverResult<T> {
        let fragment = Html::parse_fragment(&self.outer_html);
        let root = fragment
            .root_element()
            .children()
            .find_map(ElementRef::wrap)
            .ok_or(DriverError::NoContent)?;
        Ok(f(root))
    }
}

fn parse_selector(selector: &str) -> DriverResult<Selector> {
    Selector::parse(selector).map_err(|_| DriverError::Selector(selector.to_string()))
}

#[async_trait]
impl Element for HtmlElement {
    async fn attr(&self, name: &str) -> DriverResult<Option<String>> {
        self.with_root(|root| root.value().attr(name).map(str::to_string))
    }

    async fn text(&self) -> DriverResult<String> {
        self.with_root(|root| root.text().collect::<String>().trim().to_string())
    }

    async fn query_all(&self, selector: &str) -> DriverResult<Vec<Box<dyn Element>>> {
        let parsed = parse_selector(selector)?;
        self.with_root(|root| {
            root.select(&parsed)
                .map(|el| Box::new(HtmlElement::new(el.html())) as Box<dyn Element>)
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_attr_on_root() {
        let el = HtmlElement::new(r#"<div data-asin="B123" class="card">x</div>"#);
        assert_eq!(el.attr("data-asin").await.unwrap(), Some("B123".to_string()));
        assert_eq!(el.attr("data-missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_text_is_trimmed_and_collected() {
        let el = HtmlElement::new("<div>  Hello <b>World</b>  </div>");
        assert_eq!(el.text().await.unwrap(), "Hello World");
    }

    #[tokio::test]
    async fn test_query_all_searches_descendants() {
        let el = HtmlElement::new(
            r#"<div><span class="a">one</span><p><span class="a">two</span></p></div>"#,
        );
        let matches = el.query_all("span.a").await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].text().await.unwrap(), "two");
    }

    #[tokio::test]
    async fn test_count_and_first() {
        let el = HtmlElement::new(r#"<div><i class="b"></i><i class="b"></i></div>"#);
        assert_eq!(el.count("i.b").await.unwrap(), 2);
        assert_eq!(el.count("i.c").await.unwrap(), 0);
        assert!(el.first("i.b").await.unwrap().is_some());
        assert!(el.first("i.c").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_select_in_document() {
        let html = r#"<html><body>
            <div data-component-type="s-search-result" data-asin="A1"></div>
            <div data-component-type="s-search-result" data-asin="A2"></div>
        </body></html>"#;
        let cards =
            HtmlElement::select_in_document(html, "div[data-component-type='s-search-result']")
                .unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].attr("data-asin").await.unwrap(), Some("A1".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_selector_is_an_error() {
        let el = HtmlElement::new("<div></div>");
        assert!(matches!(
            el.query_all("!!not a selector").await,
            Err(DriverError::Selector(_))
        ));
    }
}
