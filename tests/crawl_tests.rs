//! Integration tests for the crawler
//!
//! These tests run the full per-keyword crawl cycle against a wiremock
//! server standing in for the marketplace.

use amzscan::config::SearchParameters;
use amzscan::crawler::KeywordCrawler;
use amzscan::driver::HttpBrowser;
use amzscan::marketplace::Country;
use amzscan::output::VecSink;
use amzscan::state::StopReason;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates test parameters with relaxed limits
fn create_test_params(keyword: &str) -> SearchParameters {
    SearchParameters {
        keywords: vec![keyword.to_string()],
        max_items_per_keyword: 50,
        max_pages: 3,
        country: Country::Us,
        min_rating: None,
        min_reviews: None,
        exclude_sponsored: false,
        fetch_details: false,
        max_detail_items: 5,
    }
}

/// Renders one result card in the current Amazon layout
fn product_card(asin: &str, title: &str, price: &str, sponsored: bool) -> String {
    let sponsored_label = if sponsored {
        r#"<span class="s-sponsored-label-text">Sponsored</span>"#
    } else {
        ""
    };
    format!(
        r#"<div data-component-type="s-search-result" data-asin="{asin}">
            <h2><a class="a-link-normal s-link-style a-text-normal"
                   href="/dp/{asin}?ref=sr_1_1">{title}</a></h2>
            <span class="a-price"><span class="a-offscreen">{price}</span></span>
            <span class="a-icon-alt">4.5 out of 5 stars</span>
            <span class="a-size-base s-underline-text">1,234</span>
            {sponsored_label}
            <img class="s-image" src="https://img.example/{asin}.jpg"/>
        </div>"#
    )
}

/// Renders a search page; `next_href` controls the pagination control
fn search_page(cards: &[String], next_href: Option<&str>) -> String {
    let next = match next_href {
        Some(href) => format!(r#"<a class="s-pagination-next" href="{href}">Next</a>"#),
        // Present but disabled: must not be followed.
        None => r#"<a class="s-pagination-next s-pagination-disabled">Next</a>"#.to_string(),
    };
    format!(
        r#"<html><body><div class="s-main-slot">{}</div>{next}</body></html>"#,
        cards.join("\n")
    )
}

fn detail_page() -> String {
    r#"<html><body>
        <div id="wayfinding-breadcrumbs_feature_div">
            <ul><li><a>Electronics</a></li><li><a>Mice</a></li></ul>
        </div>
        <div id="feature-bullets">
            <ul><li><span>Ergonomic shape</span></li></ul>
        </div>
    </body></html>"#
        .to_string()
}

async fn run_crawl(
    server: &MockServer,
    params: &SearchParameters,
    keyword: &str,
) -> (StopReason, VecSink) {
    let session = HttpBrowser::new(params.country).expect("client builds");
    let mut sink = VecSink::new();
    let base_url = Url::parse(&server.uri()).expect("mock server URI parses");

    let reason = KeywordCrawler::new(&session, params, &mut sink)
        .with_base_url(base_url)
        .crawl_keyword(keyword)
        .await;

    (reason, sink)
}

#[tokio::test]
async fn test_full_crawl_follows_pagination() {
    let mock_server = MockServer::start().await;

    let page1 = search_page(
        &[
            product_card("A1", "First", "$10.00", false),
            product_card("A2", "Second", "$11.00", false),
            product_card("A3", "Third", "$12.00", false),
        ],
        Some("/page2?k=mouse"),
    );
    let page2 = search_page(
        &[
            product_card("B1", "Fourth", "$13.00", false),
            product_card("B2", "Fifth", "$14.00", false),
        ],
        None,
    );

    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("k", "mouse"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page1))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page2))
        .mount(&mock_server)
        .await;

    let params = create_test_params("mouse");
    let (reason, sink) = run_crawl(&mock_server, &params, "mouse").await;

    assert_eq!(reason, StopReason::NoNextPage);
    assert_eq!(sink.records.len(), 5);

    let asins: Vec<&str> = sink.records.iter().map(|r| r.record.asin.as_str()).collect();
    assert_eq!(asins, vec!["A1", "A2", "A3", "B1", "B2"]);

    let pages: Vec<u32> = sink.records.iter().map(|r| r.page_index).collect();
    assert_eq!(pages, vec![1, 1, 1, 2, 2]);

    for record in &sink.records {
        assert_eq!(record.keyword, "mouse");
        assert_eq!(record.country, Country::Us);
        // Relative hrefs resolve against the crawl origin, queries gone.
        assert!(record.record.product_url.starts_with(&mock_server.uri()));
        assert!(!record.record.product_url.contains('?'));
    }
}

#[tokio::test]
async fn test_max_pages_limits_navigations() {
    let mock_server = MockServer::start().await;

    // Three pages available, each pointing at the next.
    let page1 = search_page(
        &[product_card("A1", "One", "$1.00", false)],
        Some("/page2"),
    );
    let page2 = search_page(
        &[product_card("A2", "Two", "$2.00", false)],
        Some("/page3"),
    );
    let page3 = search_page(&[product_card("A3", "Three", "$3.00", false)], None);

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page1))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page2))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page3))
        .mount(&mock_server)
        .await;

    let mut params = create_test_params("mouse");
    params.max_pages = 2;

    let (reason, sink) = run_crawl(&mock_server, &params, "mouse").await;

    assert_eq!(reason, StopReason::PageLimitReached);
    assert_eq!(sink.records.len(), 2);

    // At most two page navigations, even though a third page exists.
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.url.path() != "/page3"));
}

#[tokio::test]
async fn test_interdiction_page_emits_nothing() {
    let mock_server = MockServer::start().await;

    let captcha = r#"<html><body>
        <h4>Enter the characters you see below</h4>
        <form action="/captcha/verify"></form>
    </body></html>"#;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(503).set_body_string(captcha))
        .mount(&mock_server)
        .await;

    let params = create_test_params("mouse");
    let (reason, sink) = run_crawl(&mock_server, &params, "mouse").await;

    assert_eq!(reason, StopReason::BotProtection);
    assert!(sink.records.is_empty());

    // The keyword stops without further navigation.
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_item_budget_caps_emission_across_pages() {
    let mock_server = MockServer::start().await;

    let first_cards: Vec<String> = (0..7)
        .map(|i| product_card(&format!("A{i}"), "Item", "$5.00", false))
        .collect();
    let second_cards: Vec<String> = (0..7)
        .map(|i| product_card(&format!("B{i}"), "Item", "$5.00", false))
        .collect();

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(search_page(&first_cards, Some("/page2"))),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(search_page(&second_cards, Some("/page3"))),
        )
        .mount(&mock_server)
        .await;

    let mut params = create_test_params("mouse");
    params.max_items_per_keyword = 10;

    let (reason, sink) = run_crawl(&mock_server, &params, "mouse").await;

    // 7 from page 1, then exactly 3 more from page 2.
    assert_eq!(reason, StopReason::ItemBudgetReached);
    assert_eq!(sink.records.len(), 10);
    assert_eq!(
        sink.records.iter().filter(|r| r.page_index == 2).count(),
        3
    );
}

#[tokio::test]
async fn test_detail_enrichment_respects_ceiling() {
    let mock_server = MockServer::start().await;

    let cards: Vec<String> = (0..5)
        .map(|i| product_card(&format!("C{i}"), "Item", "$5.00", false))
        .collect();

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page(&cards, None)))
        .mount(&mock_server)
        .await;
    for i in 0..5 {
        Mock::given(method("GET"))
            .and(path(format!("/dp/C{i}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(detail_page()))
            .mount(&mock_server)
            .await;
    }

    let mut params = create_test_params("mouse");
    params.fetch_details = true;
    params.max_detail_items = 2;

    let (_, sink) = run_crawl(&mock_server, &params, "mouse").await;

    assert_eq!(sink.records.len(), 5);
    let enriched: Vec<&str> = sink
        .records
        .iter()
        .filter(|r| r.record.is_enriched())
        .map(|r| r.record.asin.as_str())
        .collect();
    assert_eq!(enriched, vec!["C0", "C1"]);

    let first = &sink.records[0].record;
    assert_eq!(
        first.category_path,
        Some(vec!["Electronics".to_string(), "Mice".to_string()])
    );
    assert_eq!(
        first.feature_bullets,
        Some(vec!["Ergonomic shape".to_string()])
    );
}

#[tokio::test]
async fn test_page_without_cards_stops_keyword() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><div class=\"s-main-slot\"></div></body></html>"),
        )
        .mount(&mock_server)
        .await;

    let params = create_test_params("obscure keyword");
    let (reason, sink) = run_crawl(&mock_server, &params, "obscure keyword").await;

    assert_eq!(reason, StopReason::NoCards);
    assert!(sink.records.is_empty());
}

#[tokio::test]
async fn test_disabled_next_control_is_not_followed() {
    let mock_server = MockServer::start().await;

    let page = search_page(&[product_card("A1", "One", "$1.00", false)], None);
    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&mock_server)
        .await;

    let params = create_test_params("mouse");
    let (reason, sink) = run_crawl(&mock_server, &params, "mouse").await;

    assert_eq!(reason, StopReason::NoNextPage);
    assert_eq!(sink.records.len(), 1);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_sponsored_filter_end_to_end() {
    let mock_server = MockServer::start().await;

    let page = search_page(
        &[
            product_card("A1", "Organic", "$1.00", false),
            product_card("A2", "Paid", "$2.00", true),
            product_card("A3", "Organic Too", "$3.00", false),
        ],
        None,
    );
    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&mock_server)
        .await;

    let mut params = create_test_params("mouse");
    params.exclude_sponsored = true;

    let (_, sink) = run_crawl(&mock_server, &params, "mouse").await;

    let asins: Vec<&str> = sink.records.iter().map(|r| r.record.asin.as_str()).collect();
    assert_eq!(asins, vec!["A1", "A3"]);
    assert!(sink.records.iter().all(|r| !r.record.is_sponsored));
}
