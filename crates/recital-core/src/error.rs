use http::StatusCode;
use serde::Serialize;

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by the jobs and voices crates. The server layer converts
/// these into actual HTTP responses, keeping domain errors decoupled
/// from axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `validation_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    ///
    /// Defaults to the `Display` rendering. Override when the display
    /// form carries internal detail that must not leak.
    fn client_message(&self) -> String {
        self.to_string()
    }

    /// Wire representation of this error
    fn body(&self) -> ErrorBody {
        ErrorBody {
            error: ErrorDetails {
                message: self.client_message(),
                r#type: self.error_type().to_string(),
                code: self.status_code().as_u16(),
            },
        }
    }
}

/// JSON error response envelope shared by all endpoints
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub message: String,
    pub r#type: String,
    pub code: u16,
}
