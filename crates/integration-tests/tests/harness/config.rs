//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use recital_config::{Config, HealthConfig, HistoryConfig, ServerConfig, StorageConfig, SynthConfig};

/// Builder for constructing test configurations
///
/// Owns a temp directory for the storage root so every test gets an
/// isolated filesystem; keep the returned guard alive for the test's
/// duration.
pub struct ConfigBuilder {
    storage_root: tempfile::TempDir,
    model_repo_url: String,
    inline_threshold_chars: usize,
    timeout_secs: u64,
    health_enabled: bool,
}

impl ConfigBuilder {
    /// Create a builder with an isolated storage root and the given
    /// model repository URL
    pub fn new(model_repo_url: &str) -> Self {
        Self {
            storage_root: tempfile::tempdir().expect("create temp storage root"),
            model_repo_url: model_repo_url.to_string(),
            inline_threshold_chars: 4000,
            timeout_secs: 30,
            health_enabled: true,
        }
    }

    /// Force every conversion onto the detached path
    pub fn always_detached(mut self) -> Self {
        self.inline_threshold_chars = 0;
        self
    }

    /// Disable the health endpoint
    pub fn without_health(mut self) -> Self {
        self.health_enabled = false;
        self
    }

    /// Build the config, returning the storage-root guard alongside it
    pub fn build(self) -> (Config, tempfile::TempDir) {
        let config = Config {
            server: ServerConfig {
                listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                health: HealthConfig {
                    enabled: self.health_enabled,
                    ..HealthConfig::default()
                },
            },
            storage: StorageConfig {
                root: self.storage_root.path().to_path_buf(),
                // Sweeps stay inert during tests
                audio_max_age_days: 0,
            },
            synth: SynthConfig {
                model_repo_url: self.model_repo_url,
                timeout_secs: self.timeout_secs,
                inline_threshold_chars: self.inline_threshold_chars,
            },
            history: HistoryConfig {
                page_limit_max: 100,
                max_age_days: 0,
            },
        };

        (config, self.storage_root)
    }
}
