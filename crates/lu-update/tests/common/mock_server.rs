//! Mock server helpers for download and release API testing

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serve `body` at `GET {route}`
pub async fn mock_archive(server: &MockServer, route: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

/// Answer `GET {route}` with a bare status code
pub async fn mock_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route.to_string()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Serve a GitHub-shaped latest-release document for lu-hut/lu-hut
pub async fn mock_latest_release(server: &MockServer, tag: &str, assets: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/repos/lu-hut/lu-hut/releases/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tag_name": tag,
            "name": tag,
            "body": "Bug fixes",
            "prerelease": false,
            "draft": false,
            "published_at": "2026-09-01T10:00:00Z",
            "assets": assets,
        })))
        .expect(1)
        .mount(server)
        .await;
}
