use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use np_core::Error;
use serde_json::json;

/// Maps store errors onto API status codes and the bodies clients expect.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "Article not found".to_string()),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            other => {
                tracing::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process request".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
