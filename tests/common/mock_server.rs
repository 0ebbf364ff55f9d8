//! Mock render frontend for end-to-end tests.

use wiremock::{
    matchers::{method, path, query_param_is_missing},
    Mock, MockServer, ResponseTemplate,
};

/// Wrapper around wiremock MockServer serving a render page
pub struct MockRenderTarget {
    pub server: MockServer,
}

impl MockRenderTarget {
    /// Start a new mock render frontend
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Base URL of the mock server
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Serve `html` at the render path for requests carrying `data`
    pub async fn mock_render_page(&self, render_path: &str, html: &str) {
        Mock::given(method("GET"))
            .and(path(render_path))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(html)
                    .insert_header("content-type", "text/html; charset=utf-8"),
            )
            .mount(&self.server)
            .await;
    }

    /// Reject render requests that arrive without a data parameter
    pub async fn mock_missing_data(&self, render_path: &str) {
        Mock::given(method("GET"))
            .and(path(render_path))
            .and(query_param_is_missing("data"))
            .respond_with(ResponseTemplate::new(400).set_body_string("missing data"))
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Decoded `data` query parameters of all requests received so far
    pub async fn received_data(&self) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|req| {
                req.url
                    .query_pairs()
                    .find(|(k, _)| k == "data")
                    .and_then(|(_, v)| serde_json::from_str(&v).ok())
            })
            .collect()
    }
}
