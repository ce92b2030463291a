//! Error taxonomy for the authentication core.
//!
//! Every failure is classified as an input error (caller can fix the data),
//! an access error (a presented credential was rejected) or an internal
//! fault. The HTTP façade maps those kinds to 400, 403 and 500.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use super::repo::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    InputError,
    AccessError,
    InternalError,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email entered is not a valid email")]
    InvalidEmail,

    #[error("Email address {0} is already being used by another user")]
    EmailInUse(String),

    #[error("Password entered is less than 6 characters long")]
    PasswordTooShort,

    #[error("name_first is not between 1 and 50 characters inclusively in length")]
    InvalidFirstName,

    #[error("name_last is not between 1 and 50 characters inclusively in length")]
    InvalidLastName,

    #[error("Error, email address {0} has not been registered")]
    EmailNotRegistered(String),

    #[error("Password is not correct")]
    IncorrectPassword,

    #[error("reset_code is not a valid reset code")]
    MalformedResetCode,

    #[error("Reset code is not correct")]
    WrongResetCode,

    #[error("Reset code has expired")]
    ExpiredResetCode,

    #[error("Request body is not valid: {0}")]
    MalformedBody(String),

    #[error("Error, token is invalid")]
    InvalidToken,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Internal(err.into())
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::MalformedBody(rejection.body_text())
    }
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidToken => ErrorKind::AccessError,
            AuthError::Internal(_) => ErrorKind::InternalError,
            _ => ErrorKind::InputError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InputError => StatusCode::BAD_REQUEST,
            ErrorKind::AccessError => StatusCode::FORBIDDEN,
            ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AuthError::Internal(e) => {
                error!(error = %e, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = json!({
            "code": status.as_u16(),
            "name": self.kind(),
            "message": message,
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_taxonomy() {
        assert_eq!(AuthError::InvalidEmail.kind(), ErrorKind::InputError);
        assert_eq!(AuthError::WrongResetCode.kind(), ErrorKind::InputError);
        assert_eq!(AuthError::InvalidToken.kind(), ErrorKind::AccessError);
        let internal = AuthError::from(StoreError::NotFound(3));
        assert_eq!(internal.kind(), ErrorKind::InternalError);
    }

    #[test]
    fn status_codes_match_kinds() {
        assert_eq!(AuthError::PasswordTooShort.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::InvalidToken.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_name_the_offending_email() {
        let err = AuthError::EmailInUse("leonwu@gmail.com".into());
        assert_eq!(
            err.to_string(),
            "Email address leonwu@gmail.com is already being used by another user"
        );
    }

    #[test]
    fn malformed_reset_code_uses_field_name() {
        assert_eq!(
            AuthError::MalformedResetCode.to_string(),
            "reset_code is not a valid reset code"
        );
    }

    #[test]
    fn malformed_body_is_an_input_error() {
        let err = AuthError::MalformedBody("missing field `email`".into());
        assert_eq!(err.kind(), ErrorKind::InputError);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_hide_details_from_clients() {
        let res = AuthError::Internal(anyhow::anyhow!("secret detail")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
