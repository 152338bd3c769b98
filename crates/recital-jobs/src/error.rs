use http::StatusCode;
use recital_core::HttpError;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, JobError>;

/// Errors surfaced by job operations
///
/// Validation errors occur before any record exists; synthesis failures
/// never appear here because they are captured into the job record
/// instead of crossing the submission boundary.
#[derive(Debug, Error)]
pub enum JobError {
    /// Extraction produced no speakable text
    #[error("no speakable text found in the markdown input")]
    EmptyInput,

    /// Requested voice is not in the catalog
    #[error(transparent)]
    UnknownVoice(#[from] recital_voices::UnknownVoice),

    /// No record for this conversion id
    #[error("conversion '{0}' not found")]
    NotFound(Uuid),

    /// The conversion has not completed yet
    #[error("conversion '{0}' is not completed yet")]
    NotReady(Uuid),

    /// History store or filesystem failure
    #[error("storage error: {0}")]
    Storage(String),
}

impl HttpError for JobError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyInput | Self::UnknownVoice(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) | Self::NotReady(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::EmptyInput | Self::UnknownVoice(_) => "validation_error",
            Self::NotFound(_) => "not_found_error",
            Self::NotReady(_) => "not_ready_error",
            Self::Storage(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            // Storage detail is for logs, not API consumers
            Self::Storage(_) => "internal storage error".to_string(),
            _ => self.to_string(),
        }
    }
}
