use jiff::Timestamp;
use recital_jobs::{ConversionJob, JobStatus};
use recital_voices::VoiceModel;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /convert`
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    /// Markdown document to convert
    pub markdown_text: String,
    /// Optional display title, also used for the download filename
    #[serde(default)]
    pub title: Option<String>,
    /// Voice id from the catalog; the default voice when omitted
    #[serde(default)]
    pub voice_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub conversion_id: Uuid,
    pub status: JobStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub conversion_id: Uuid,
    pub status: JobStatus,
    pub voice_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceModel>,
    pub default_voice: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text_preview: String,
    pub created_at: Timestamp,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// URL a finished conversion downloads from
pub fn download_url(id: Uuid) -> String {
    format!("/download/{id}")
}

impl From<ConversionJob> for HistoryItem {
    fn from(job: ConversionJob) -> Self {
        let download_url =
            (job.status == JobStatus::Completed && job.audio_path.is_some())
                .then(|| download_url(job.id));

        Self {
            id: job.id,
            title: job.title,
            text_preview: job.text_preview,
            created_at: job.created_at,
            status: job.status,
            file_size: job.file_size,
            download_url,
        }
    }
}
