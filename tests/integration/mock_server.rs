//! Mock FCM server setup for integration tests

use async_fcm::{FcmClient, FcmClientBuilder};
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const PROJECT_ID: &str = "test-project";
pub const ACCESS_TOKEN: &str = "test-token";
pub const SEND_PATH: &str = "/v1/projects/test-project/messages:send";
pub const BATCH_BOUNDARY: &str = "batch_mock_boundary";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    /// A client whose send, batch and IID endpoints all point at the mock server
    pub fn create_test_client(&self) -> async_fcm::Result<FcmClient> {
        FcmClientBuilder::new()
            .with_project_id(PROJECT_ID)
            .with_access_token(ACCESS_TOKEN)
            .base_url_override(&self.base_url)
            .iid_url_override(&self.base_url)
            .build()
    }

    /// Create a mock for a JSON response
    pub async fn mock_json_response(&self, path: &str, status: usize, body: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", path)
            .match_header("authorization", format!("Bearer {}", ACCESS_TOKEN).as_str())
            .with_status(status)
            .with_header("content-type", "application/json; charset=UTF-8")
            .with_body(body)
            .create_async()
            .await
    }

    /// Create a mock answering `/batch` with one embedded response per `(status line, body)`
    pub async fn mock_batch_response(&self, parts: &[(&str, &str)]) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", "/batch")
            .match_header(
                "content-type",
                Matcher::Regex(r"^multipart/mixed; boundary=batch_".to_string()),
            )
            .with_status(200)
            .with_header(
                "content-type",
                format!("multipart/mixed; boundary={}", BATCH_BOUNDARY).as_str(),
            )
            .with_body(multipart_body(BATCH_BOUNDARY, parts))
            .create_async()
            .await
    }

    /// Create a mock that must never be hit
    pub async fn mock_unreachable(&self, path: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", path)
            .with_status(500)
            .expect(0)
            .create_async()
            .await
    }
}

/// Render a provider-style multipart batch response body.
pub fn multipart_body(boundary: &str, parts: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (i, (status_line, json)) in parts.iter().enumerate() {
        body.push_str(&format!("\r\n--{}\r\n", boundary));
        body.push_str("Content-Type: application/http\r\n");
        body.push_str(&format!("Content-ID: response-{}\r\n\r\n", i + 1));
        body.push_str(&format!("{}\r\n", status_line));
        body.push_str("Content-Type: application/json; charset=UTF-8\r\n");
        body.push_str("Vary: Origin\r\n\r\n");
        body.push_str(json);
        body.push_str("\r\n");
    }
    body.push_str(&format!("\r\n--{}--\r\n", boundary));
    body
}
