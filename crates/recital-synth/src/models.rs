//! Voice model cache with single-flight remote fetch
//!
//! Models live under a voice-id-keyed path in the models directory and
//! are downloaded from the configured repository on first use. Fetches
//! are single-flight per voice id: concurrent requests for the same
//! uncached voice share one download.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use dashmap::DashMap;
use recital_voices::VoiceModel;
use tokio::sync::OnceCell;

use crate::error::{Result, SynthError};

/// Shared HTTP client for model downloads
fn http_client() -> reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

    CLIENT
        .get_or_init(|| {
            reqwest::Client::builder()
                // Model files run to tens of megabytes; allow slow links
                .timeout(Duration::from_secs(600))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .expect("failed to build default HTTP client")
        })
        .clone()
}

/// Local paths of a voice's model artifacts
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub model: PathBuf,
    pub config: PathBuf,
}

pub struct ModelCache {
    models_dir: PathBuf,
    repo_url: String,
    client: reqwest::Client,
    inflight: DashMap<String, Arc<OnceCell<ModelPaths>>>,
}

impl ModelCache {
    pub fn new(models_dir: PathBuf, repo_url: String) -> Self {
        Self {
            models_dir,
            repo_url: repo_url.trim_end_matches('/').to_string(),
            client: http_client(),
            inflight: DashMap::new(),
        }
    }

    fn paths_for(&self, voice_id: &str) -> ModelPaths {
        ModelPaths {
            model: self.models_dir.join(format!("{voice_id}.onnx")),
            config: self.models_dir.join(format!("{voice_id}.onnx.json")),
        }
    }

    /// Make sure the voice's artifacts are present locally
    ///
    /// Returns immediately when both files already exist. Otherwise the
    /// first caller downloads while concurrent callers for the same voice
    /// await the shared result. A failed fetch leaves the slot empty so a
    /// later job can try again.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::ModelUnavailable`] when the repository cannot
    /// be reached or does not have the artifact
    pub async fn ensure(&self, voice: &VoiceModel) -> Result<ModelPaths> {
        let cell = self
            .inflight
            .entry(voice.id.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        cell.get_or_try_init(|| self.fetch(voice)).await.cloned()
    }

    async fn fetch(&self, voice: &VoiceModel) -> Result<ModelPaths> {
        let paths = self.paths_for(&voice.id);

        if paths.model.exists() && paths.config.exists() {
            return Ok(paths);
        }

        let artifact = voice.artifact_path();
        tracing::info!(voice = %voice.id, "downloading voice model");

        self.download(&format!("{}/{artifact}.onnx", self.repo_url), &paths.model)
            .await?;
        self.download(
            &format!("{}/{artifact}.onnx.json", self.repo_url),
            &paths.config,
        )
        .await?;

        tracing::info!(voice = %voice.id, "voice model downloaded");
        Ok(paths)
    }

    /// Fetch one artifact, writing through a temp file so a failed
    /// download never leaves a torn file at the final path
    async fn download(&self, url: &str, dest: &std::path::Path) -> Result<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SynthError::ModelUnavailable(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynthError::ModelUnavailable(format!(
                "{url} returned HTTP {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthError::ModelUnavailable(format!("read of {url} failed: {e}")))?;

        let file_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let part = dest.with_file_name(format!("{file_name}.part"));

        tokio::fs::write(&part, &bytes)
            .await
            .map_err(|e| SynthError::ModelUnavailable(format!("write {}: {e}", part.display())))?;
        tokio::fs::rename(&part, dest)
            .await
            .map_err(|e| SynthError::ModelUnavailable(format!("rename {}: {e}", dest.display())))?;

        Ok(())
    }
}
