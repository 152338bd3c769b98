use thiserror::Error;

pub type Result<T> = std::result::Result<T, SynthError>;

/// Synthesis pipeline errors
///
/// None of these are retried automatically; the job manager records them
/// as a failed job with a summarized message.
#[derive(Debug, Error)]
pub enum SynthError {
    /// Voice model fetch failed (network error or missing remote artifact)
    #[error("voice model unavailable: {0}")]
    ModelUnavailable(String),

    /// The engine rejected the input or produced no audio
    #[error("synthesis failed: {0}")]
    Synthesis(String),

    /// The synthesis call exceeded the configured deadline
    #[error("synthesis timed out after {0}s")]
    SynthesisTimeout(u64),

    /// Audio encoding failed
    #[error("audio encoding failed: {0}")]
    Encode(String),
}
