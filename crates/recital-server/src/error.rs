use axum::{
    Json,
    response::{IntoResponse, Response},
};
use recital_core::HttpError;
use recital_jobs::JobError;

/// Axum-facing wrapper around job errors
///
/// The domain error carries its own status code and wire body via
/// [`HttpError`]; this type only exists to satisfy `IntoResponse`.
pub struct ApiError(JobError);

impl From<JobError> for ApiError {
    fn from(error: JobError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0.status_code(), Json(self.0.body())).into_response()
    }
}
