//! Discovery against a mock site

use lumen_sweep::crawler::{build_http_client, Discoverer, SiteCrawler};
use tokio::sync::mpsc;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"),
        )
        .mount(server)
        .await;
}

async fn discover(seed: &str, max_depth: u32) -> Vec<String> {
    let crawler = SiteCrawler::new(
        build_http_client().expect("client"),
        Url::parse(seed).expect("seed"),
        max_depth,
    )
    .expect("crawler");

    let (tx, mut rx) = mpsc::unbounded_channel();
    crawler.discover(tx).await.expect("discover");

    let mut found = Vec::new();
    while let Some(url) = rx.recv().await {
        found.push(url.path().to_string());
    }
    found
}

async fn site() -> MockServer {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        r#"<html><body>
            <a href="/page1">Page 1</a>
            <a href="/page2#part">Page 2</a>
            <a href="/page1">Page 1 again</a>
            <a href="/missing">Missing</a>
            <a href="/data.json">Data</a>
            <a href="https://elsewhere.test/">Off site</a>
        </body></html>"#,
    )
    .await;
    mount_html(&server, "/page1", r#"<html><body><a href="/deep">Deep</a></body></html>"#).await;
    mount_html(&server, "/page2", "<html><body>Page 2</body></html>").await;
    mount_html(&server, "/deep", "<html><body>Deep</body></html>").await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
        )
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_depth_one_is_seed_only() {
    let server = site().await;
    let found = discover(&format!("{}/", server.uri()), 1).await;
    assert_eq!(found, vec!["/"]);
}

#[tokio::test]
async fn test_depth_two_follows_seed_links_once() {
    let server = site().await;
    let found = discover(&format!("{}/", server.uri()), 2).await;

    // 404s, non-HTML, off-site and duplicate links never surface
    assert_eq!(found, vec!["/", "/page1", "/page2"]);
}

#[tokio::test]
async fn test_depth_three_reaches_everything() {
    let server = site().await;
    let found = discover(&format!("{}/", server.uri()), 3).await;
    assert_eq!(found, vec!["/", "/page1", "/page2", "/deep"]);
}

#[tokio::test]
async fn test_depth_zero_is_seed_only() {
    let server = site().await;
    let found = discover(&format!("{}/", server.uri()), 0).await;
    assert_eq!(found, vec!["/"]);
}

#[tokio::test]
async fn test_redirected_page_is_reported_once() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<html><body><a href="/old">Old</a><a href="/page1">Page 1</a></body></html>"#,
    )
    .await;
    mount_html(&server, "/page1", "<html><body>Page 1</body></html>").await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/page1"))
        .mount(&server)
        .await;

    let found = discover(&format!("{}/", server.uri()), 2).await;
    assert_eq!(found, vec!["/", "/page1"]);
}
