use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::GuardError;
use crate::api::ErrorResponse;

/// converts `GuardError` into appropriate HTTP responses
#[derive(Debug)]
pub struct AppError(pub GuardError);

impl From<GuardError> for AppError {
    fn from(err: GuardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            GuardError::InvalidCredentials | GuardError::SessionInvalid(_) => {
                StatusCode::UNAUTHORIZED
            }
            GuardError::Unavailable(_) | GuardError::MalformedResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            GuardError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            GuardError::StoreError(_)
            | GuardError::ConfigurationError(_)
            | GuardError::TransformFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}
