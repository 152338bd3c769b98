//! Mock voice model repository
//!
//! Serves fake model artifacts over HTTP on a random port and counts
//! model downloads per voice so tests can assert single-flight fetches.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use tokio_util::sync::CancellationToken;

type Hits = Arc<Mutex<HashMap<String, usize>>>;

/// A running mock repository instance
pub struct MockModelRepo {
    addr: SocketAddr,
    hits: Hits,
    shutdown: CancellationToken,
}

impl MockModelRepo {
    /// Start the repository on a random port
    pub async fn start() -> anyhow::Result<Self> {
        let hits: Hits = Arc::new(Mutex::new(HashMap::new()));

        let app = Router::new()
            .route("/{*path}", get(artifact_handler))
            .with_state(Arc::clone(&hits));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            hits,
            shutdown,
        })
    }

    /// Base URL to point `synth.model_repo_url` at
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// How many times the given voice's model file was downloaded
    pub fn model_fetches(&self, voice_id: &str) -> usize {
        self.hits
            .lock()
            .expect("hit counter lock")
            .get(voice_id)
            .copied()
            .unwrap_or(0)
    }
}

impl Drop for MockModelRepo {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn artifact_handler(
    State(hits): State<Hits>,
    Path(path): Path<String>,
) -> impl IntoResponse {
    // Paths look like `en/en_US/lessac/medium/<voice_id>.onnx[.json]`
    let file_name = path.rsplit('/').next().unwrap_or(&path);

    if let Some(voice_id) = file_name.strip_suffix(".onnx") {
        let mut hits = hits.lock().expect("hit counter lock");
        *hits.entry(voice_id.to_string()).or_insert(0) += 1;

        // The mock engine never parses this
        return (
            [(axum::http::header::CONTENT_TYPE, "application/octet-stream")],
            vec![0u8; 256],
        )
            .into_response();
    }

    if file_name.ends_with(".onnx.json") {
        return (
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            br#"{"audio": {"sample_rate": 22050}}"#.to_vec(),
        )
            .into_response();
    }

    axum::http::StatusCode::NOT_FOUND.into_response()
}
