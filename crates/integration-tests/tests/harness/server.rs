//! Test server wrapper that starts Recital on a random port

use std::net::SocketAddr;
use std::sync::Arc;

use recital_config::Config;
use recital_server::Server;
use recital_synth::SpeechEngine;
use tokio_util::sync::CancellationToken;

use super::engine::MockEngine;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
}

impl TestServer {
    /// Start a test server with the mock engine
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        Self::start_with_engine(config, Arc::new(MockEngine)).await
    }

    /// Start a test server with a caller-supplied engine
    ///
    /// Binds to port 0 for automatic port assignment
    pub async fn start_with_engine(
        config: Config,
        engine: Arc<dyn SpeechEngine>,
    ) -> anyhow::Result<Self> {
        let server = Server::with_engine(config, engine).await?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, server.into_router())
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        let client = reqwest::Client::new();

        Ok(Self {
            addr,
            shutdown,
            client,
        })
    }

    /// Full URL for a path on the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Get a reference to the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Poll the status endpoint until the conversion reaches a terminal
    /// state, returning the final status body
    pub async fn wait_until_terminal(&self, id: &str) -> serde_json::Value {
        for _ in 0..200 {
            let resp = self
                .client
                .get(self.url(&format!("/status/{id}")))
                .send()
                .await
                .expect("status request");
            let body: serde_json::Value = resp.json().await.expect("status body");

            match body["status"].as_str() {
                Some("completed" | "failed") => return body,
                _ => tokio::time::sleep(std::time::Duration::from_millis(25)).await,
            }
        }

        panic!("conversion {id} did not reach a terminal state");
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
