use serde::Deserialize;

/// Default Piper voices release on HuggingFace
pub const DEFAULT_MODEL_REPO_URL: &str =
    "https://huggingface.co/rhasspy/piper-voices/resolve/v1.0.0";

/// Speech synthesis configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynthConfig {
    /// Base URL of the remote voice model repository
    #[serde(default = "default_model_repo_url")]
    pub model_repo_url: String,
    /// Hard deadline for a single synthesis call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Markdown input at or below this many bytes is synthesized within
    /// the request; longer inputs are processed on a spawned task and
    /// polled via the status endpoint
    #[serde(default = "default_inline_threshold_chars")]
    pub inline_threshold_chars: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            model_repo_url: default_model_repo_url(),
            timeout_secs: default_timeout_secs(),
            inline_threshold_chars: default_inline_threshold_chars(),
        }
    }
}

fn default_model_repo_url() -> String {
    DEFAULT_MODEL_REPO_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_inline_threshold_chars() -> usize {
    4000
}
