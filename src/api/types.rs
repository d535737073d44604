use serde::{Deserialize, Serialize};

use crate::{Credentials, GuardError};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub otp: Option<String>,
}

impl From<LoginRequest> for Credentials {
    fn from(request: LoginRequest) -> Self {
        Credentials {
            email: request.email,
            password: request.password,
            otp: request.otp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<GuardError> for ErrorResponse {
    fn from(err: GuardError) -> Self {
        let code = match &err {
            GuardError::SessionInvalid(_) => "SESSION_INVALID",
            GuardError::InvalidCredentials => "INVALID_CREDENTIALS",
            GuardError::Unavailable(_) => "BACKEND_UNAVAILABLE",
            GuardError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            GuardError::Timeout => "TIMEOUT",
            GuardError::StoreError(_) => "STORE_ERROR",
            GuardError::ConfigurationError(_) => "CONFIGURATION_ERROR",
            GuardError::TransformFault(_) => "TRANSFORM_FAULT",
        };

        ErrorResponse {
            error: err.to_string(),
            code: code.to_owned(),
        }
    }
}
