use axum::body::Body;
use serde::de::DeserializeOwned;

/// Extractor for JSON request bodies
///
/// Checks the content type and bounds the body size before parsing, so
/// handlers only ever see a well-formed payload.
pub struct ExtractPayload<T>(pub T);

/// Markdown documents can be sizeable; allow up to 2 MiB
const BODY_LIMIT_BYTES: usize = 2 << 20;

static APPLICATION_JSON: http::HeaderValue = http::HeaderValue::from_static("application/json");

impl<S, T: DeserializeOwned> axum::extract::FromRequest<S> for ExtractPayload<T>
where
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request(
        request: http::Request<Body>,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        use axum::response::IntoResponse;

        let (parts, body) = request.into_parts();

        if parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .is_none_or(|value| value != APPLICATION_JSON)
        {
            return Err((
                http::StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Unsupported Content-Type, expected: 'Content-Type: application/json'",
            )
                .into_response());
        }

        let bytes = axum::body::to_bytes(body, BODY_LIMIT_BYTES)
            .await
            .map_err(|err| {
                if std::error::Error::source(&err)
                    .is_some_and(|source| source.is::<http_body_util::LengthLimitError>())
                {
                    (
                        http::StatusCode::PAYLOAD_TOO_LARGE,
                        format!("Request body is too large, limit is {BODY_LIMIT_BYTES} bytes"),
                    )
                } else {
                    (
                        http::StatusCode::BAD_REQUEST,
                        format!("Failed to read request body: {err}"),
                    )
                }
                .into_response()
            })?;

        let payload = serde_json::from_slice::<T>(&bytes).map_err(|err| {
            (
                http::StatusCode::BAD_REQUEST,
                format!("Invalid request body: {err}"),
            )
                .into_response()
        })?;

        Ok(Self(payload))
    }
}
