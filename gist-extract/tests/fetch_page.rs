use gist_extract::{fetch_page, fetch_visible_text};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetch_page_sends_browser_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<body>ok</body>"))
        .expect(1)
        .mount(&server)
        .await;

    let body = fetch_page(&format!("{}/article", server.uri()))
        .await
        .expect("fetch should succeed");
    assert_eq!(body, "<body>ok</body>");
}

#[tokio::test]
async fn fetch_and_flatten_end_to_end() {
    let server = MockServer::start().await;

    let html = "<html><head><title>X</title></head><body>Hello <b>World</b></body></html>";
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&server)
        .await;

    let text = fetch_visible_text(&server.uri())
        .await
        .expect("pipeline should succeed");
    assert_eq!(text, "Hello World");
}

#[tokio::test]
async fn non_2xx_status_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let err = fetch_page(&format!("{}/gone", server.uri()))
        .await
        .expect_err("404 should fail");
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn unreachable_host_is_fatal() {
    // Nothing listens on this port.
    let err = fetch_page("http://127.0.0.1:1/page")
        .await
        .expect_err("connection refused should fail");
    assert!(matches!(err, gist_common::GistError::Fetch(_)));
}
