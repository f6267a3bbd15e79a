use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use serde_json::json;

use cryptotasks_core::{DomainError, SessionToken};

/// Response header carrying a freshly issued session token.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Unauthenticated => {
            json_error(StatusCode::UNAUTHORIZED, "unauthenticated", err.to_string())
        }
        DomainError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", err.to_string())
        }
        DomainError::DuplicateUser(_) => {
            json_error(StatusCode::CONFLICT, "duplicate_user", err.to_string())
        }
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// 303 See Other.
pub fn redirect(to: &str) -> axum::response::Response {
    Redirect::to(to).into_response()
}

/// 303 See Other that also hands the client its session token.
pub fn redirect_with_session(to: &str, token: SessionToken) -> axum::response::Response {
    ([(SESSION_TOKEN_HEADER, token.to_string())], Redirect::to(to)).into_response()
}
