#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod request;
mod routes;
mod state;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use recital_config::Config;
use recital_jobs::{HistoryStore, JobManager, RetentionPolicy};
use recital_synth::{FfmpegTranscoder, ModelCache, PiperEngine, SpeechEngine, Synthesizer};
use recital_voices::VoiceRegistry;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Assembled server with all routes and middleware
pub struct Server {
    router: axum::Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration with the Piper engine
    ///
    /// # Errors
    ///
    /// Returns an error if the storage layout cannot be created or the
    /// history database fails to open
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::with_engine(config, Arc::new(PiperEngine::new())).await
    }

    /// Build the server with a caller-provided speech engine
    ///
    /// The seam tests use to swap the acoustic runtime for a
    /// deterministic fake.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`]
    pub async fn with_engine(
        config: Config,
        engine: Arc<dyn SpeechEngine>,
    ) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        config
            .storage
            .ensure_layout()
            .map_err(|e| anyhow::anyhow!("failed to create storage layout: {e}"))?;

        let registry = Arc::new(VoiceRegistry::new());
        tracing::info!(voices = registry.len(), "voice registry loaded");

        let cache = ModelCache::new(
            config.storage.models_dir(),
            config.synth.model_repo_url.clone(),
        );

        // Capability probe runs once; synthesis never re-checks
        let transcoder = FfmpegTranscoder::detect().await;

        let synthesizer = Arc::new(Synthesizer::new(
            engine,
            cache,
            transcoder,
            Duration::from_secs(config.synth.timeout_secs),
        ));

        let history = Arc::new(HistoryStore::open(&config.storage.history_db_path())?);

        let manager = Arc::new(JobManager::new(
            Arc::clone(&registry),
            synthesizer,
            history,
            config.storage.audio_dir(),
            RetentionPolicy {
                history_max_age_days: config.history.max_age_days,
                audio_max_age_days: config.storage.audio_max_age_days,
            },
        ));

        let state = AppState {
            manager,
            registry,
            inline_threshold_chars: config.synth.inline_threshold_chars,
            page_limit_max: config.history.page_limit_max,
        };

        let mut app = routes::endpoint_router();

        if config.server.health.enabled {
            app = app.route(
                &config.server.health.path,
                axum::routing::get(routes::health_handler),
            );
        }

        let router = app.with_state(state).layer(TraceLayer::new_for_http());

        Ok(Self {
            router,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> axum::Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
