use jiff::Timestamp;
use recital_synth::AudioFormat;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a conversion
///
/// Transitions are strictly forward: pending → processing →
/// {completed | failed}. Terminal states only leave the store through
/// deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One markdown-to-audio conversion and its tracked lifecycle
///
/// Mutated only by the job manager while in flight; the history store
/// holds the durable copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionJob {
    pub id: Uuid,
    pub title: Option<String>,
    pub source_markdown: String,
    /// Short prefix of the input, stored at creation for listings
    pub text_preview: String,
    pub voice_id: String,
    pub status: JobStatus,
    pub created_at: Timestamp,
    /// Set when the job completes successfully
    pub completed_at: Option<Timestamp>,
    /// Set iff status is completed
    pub audio_path: Option<String>,
    pub audio_format: Option<AudioFormat>,
    pub file_size: Option<u64>,
    /// Set iff status is failed
    pub error: Option<String>,
}

impl ConversionJob {
    /// Create a fresh pending job
    pub fn new(
        title: Option<String>,
        source_markdown: String,
        text_preview: String,
        voice_id: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            source_markdown,
            text_preview,
            voice_id,
            status: JobStatus::Pending,
            created_at: Timestamp::now(),
            completed_at: None,
            audio_path: None,
            audio_format: None,
            file_size: None,
            error: None,
        }
    }
}
