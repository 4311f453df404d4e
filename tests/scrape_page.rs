// tests/scrape_page.rs
use deal_scanner::error::FetchError;
use deal_scanner::scrape::{fetch_content, HttpPageFetcher, PageContent, PageFetcher, Unavailable};
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const DEAL_PAGE: &str = r#"<html><head><title>Deal</title></head><body>
<nav>Menu</nav>
<div class="content-section">Some content details
more
Features
And here are some features

</div>
<footer>About</footer>
</body></html>"#;

fn fetcher() -> HttpPageFetcher {
    HttpPageFetcher::new(Duration::from_secs(5)).expect("client")
}

#[tokio::test]
async fn content_region_is_extracted_from_live_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/deal/123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(DEAL_PAGE)
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let content = fetch_content(&fetcher(), &format!("{}/deal/123", server.uri())).await;
    match content {
        PageContent::Available(text) => {
            assert!(!text.contains('\n'));
            assert!(text.starts_with("Some content details Features"));
            assert!(!text.contains("Menu"));
            assert!(!text.contains("About"));
        }
        other => panic!("expected content, got {other:?}"),
    }
}

#[tokio::test]
async fn page_without_region_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bare"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>No content</html>"))
        .mount(&server)
        .await;

    let content = fetch_content(&fetcher(), &format!("{}/bare", server.uri())).await;
    assert!(matches!(
        content,
        PageContent::Unavailable(Unavailable::MissingRegion)
    ));
}

#[tokio::test]
async fn http_404_degrades_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let err = fetcher().get(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Http { status: 404 }));

    let content = fetch_content(&fetcher(), &url).await;
    assert!(matches!(
        content,
        PageContent::Unavailable(Unavailable::Fetch(FetchError::Http { status: 404 }))
    ));
    assert_eq!(content.into_text(), "");
}

#[tokio::test]
async fn unreachable_host_degrades_to_empty() {
    // Nothing listens on port 9 locally.
    let content = fetch_content(&fetcher(), "http://127.0.0.1:9/deal").await;
    assert!(matches!(
        content,
        PageContent::Unavailable(Unavailable::Fetch(FetchError::Network(_)))
    ));
    assert_eq!(content.into_text(), "");
}
