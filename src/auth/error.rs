//! Authentication and authorization errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use super::token::VerifyError;

/// Errors surfaced at the authentication boundary.
///
/// Display strings double as the wire error messages, so they must stay
/// stable: clients match on `invalid credentials`, `missing token` and
/// `forbidden` exactly.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. Deliberately covers both so
    /// responses do not reveal which part was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Authorization header absent or not a well-formed Bearer header.
    #[error("missing token")]
    MissingToken,

    /// Token present but failed verification.
    #[error("{0}")]
    Verification(#[from] VerifyError),

    /// Authenticated but lacking every required role.
    #[error("forbidden")]
    InsufficientRole,

    /// Failure inside the auth machinery itself, never caused by client
    /// input. The detail is logged, not sent.
    #[error("internal authentication error")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::Verification(_) => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientRole => StatusCode::FORBIDDEN,
            AuthError::Internal(detail) => {
                error!(detail = %detail, "auth internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorBody {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
