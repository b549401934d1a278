//! Common test utilities - PosterdTest harness for end-to-end testing

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use posterd::auth::AuthPolicy;
use posterd::config::GeminiConfig;
use posterd::{Config, Server};
use reqwest::Client;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use wiremock::MockServer;

/// Path the relay posts to on the mock Gemini server
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash-image-preview:generateContent";

/// Base64 of a few JPEG header bytes, good enough as an upload
pub fn sample_jpeg_b64() -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'])
}

/// Gemini reply carrying one text part and one image part
pub fn gemini_image_reply(data: &str) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    {"text": "Here is your poster."},
                    {"inlineData": {"mimeType": "image/jpeg", "data": data}}
                ]
            },
            "finishReason": "STOP"
        }]
    })
}

/// Options for starting a test server
pub struct TestOptions {
    pub api_key: Option<String>,
    pub auth: AuthPolicy,
    pub timeout_secs: Option<u64>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            api_key: Some("test-key".to_string()),
            auth: AuthPolicy::default(),
            timeout_secs: None,
        }
    }
}

/// Test harness that spawns a real posterd server on a random port,
/// wired to a mock Gemini API
pub struct PosterdTest {
    pub addr: SocketAddr,
    pub client: Client,
    pub gemini: MockServer,
    server: Arc<Server>,
    _handle: JoinHandle<()>,
}

impl PosterdTest {
    /// Start a new test server instance with default options
    pub async fn start() -> Result<Self> {
        Self::start_with(TestOptions::default()).await
    }

    /// Start a new test server instance
    pub async fn start_with(options: TestOptions) -> Result<Self> {
        let gemini = MockServer::start().await;

        // Find a random available port
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);

        let config = Config {
            bind_addr: addr,
            gemini: GeminiConfig {
                api_key: options.api_key,
                base_url: format!("{}/v1beta", gemini.uri()),
                timeout_secs: options.timeout_secs,
                ..GeminiConfig::default()
            },
            auth: options.auth,
            ..Config::default()
        };

        let server = Arc::new(Server::new(config)?);
        let server_clone = server.clone();

        // Spawn the server in a background task
        let handle = tokio::spawn(async move {
            if let Err(e) = server_clone.run().await {
                eprintln!("Server error: {}", e);
            }
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        // Poll until server is ready (max 2 seconds)
        let mut ready = false;
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if client
                .get(format!("http://{}/", addr))
                .send()
                .await
                .is_ok()
            {
                ready = true;
                break;
            }
        }

        if !ready {
            panic!("Server failed to start within 2 seconds");
        }

        Ok(Self {
            addr,
            client,
            gemini,
            server,
            _handle: handle,
        })
    }

    /// Get the base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url(), path))
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}{}", self.base_url(), path))
            .json(body)
            .send()
            .await?)
    }

    /// Make an authenticated POST request
    pub async fn post_auth<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        token: &str,
    ) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}{}", self.base_url(), path))
            .header("Authorization", format!("Bearer {}", token))
            .json(body)
            .send()
            .await?)
    }

    /// Number of requests the mock Gemini server has received
    pub async fn gemini_calls(&self) -> usize {
        self.gemini
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }
}

impl Drop for PosterdTest {
    fn drop(&mut self) {
        self.server.shutdown();
    }
}
