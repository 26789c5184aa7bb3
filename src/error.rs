use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::store::StoreError;

/// Errors surfaced by the auth core. Each maps to one HTTP response;
/// nothing is retried.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("already registered")]
    DuplicateAccount,

    // Same message for unknown email and wrong password, so callers
    // cannot probe which addresses have accounts.
    #[error("email or password is incorrect")]
    InvalidCredentials,

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::DuplicateAccount => StatusCode::FORBIDDEN,
            AuthError::InvalidCredentials => StatusCode::FORBIDDEN,
            AuthError::Store(_) | AuthError::Config(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to the client. Store and internal details
    /// stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Store(_) | AuthError::Internal(_) => "internal server error".to_string(),
            AuthError::Config(_) => "server configuration error".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, "request rejected");
        }
        (
            status,
            Json(ErrorBody {
                message: self.user_message(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            AuthError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::DuplicateAccount.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::Config("missing secret".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_details_not_leaked_to_client() {
        let err = AuthError::Store(StoreError::Database(sqlx::Error::PoolClosed));
        assert_eq!(err.user_message(), "internal server error");
    }

    #[test]
    fn duplicate_account_message() {
        assert_eq!(
            AuthError::DuplicateAccount.user_message(),
            "already registered"
        );
    }
}
