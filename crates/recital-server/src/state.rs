use std::sync::Arc;

use recital_jobs::JobManager;
use recital_voices::VoiceRegistry;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<JobManager>,
    pub registry: Arc<VoiceRegistry>,
    /// Markdown at or below this many bytes converts within the request
    pub inline_threshold_chars: usize,
    /// Clamp for the history `limit` query parameter
    pub page_limit_max: usize,
}
