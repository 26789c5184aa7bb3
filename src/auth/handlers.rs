use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, instrument, warn};

use crate::{
    auth::{
        dto::{CredentialsRequest, Msg, PublicUser, TokenResponse},
        jwt::AuthUser,
    },
    error::AuthError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Boundary validation: trim surrounding whitespace, require an
/// email-shaped address and a non-empty password. Case is left to the
/// store's collation.
fn validate(payload: &mut CredentialsRequest) -> Result<(), AuthError> {
    payload.email = payload.email.trim().to_string();
    if payload.email.is_empty() || !is_valid_email(&payload.email) {
        return Err(AuthError::Validation("invalid email".into()));
    }
    if payload.password.is_empty() {
        return Err(AuthError::Validation("password must not be empty".into()));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<Msg>), AuthError> {
    validate(&mut payload)?;
    let ack = state.auth.signup(&payload.email, &payload.password).await?;
    Ok((StatusCode::CREATED, Json(ack)))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    validate(&mut payload)?;
    let body = state.auth.login(&payload.email, &payload.password).await?;
    Ok(Json(body))
}

#[instrument(skip(state))]
async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = state
        .auth
        .store()
        .find_by_email(&claims.email)
        .await
        .map_err(|e| {
            error!(error = %e, "me lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        })?
        .ok_or_else(|| {
            warn!(user_id = claims.sub, "token subject no longer exists");
            (StatusCode::UNAUTHORIZED, "User not found".to_string())
        })?;

    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@x.com"));
        assert!(!is_valid_email("spaces in@x.com"));
        assert!(!is_valid_email("a@nodot"));
    }

    #[test]
    fn validate_trims_email_and_requires_password() {
        let mut payload = CredentialsRequest {
            email: "  a@x.com  ".into(),
            password: "pw123456".into(),
        };
        validate(&mut payload).expect("valid");
        assert_eq!(payload.email, "a@x.com");

        let mut empty_pw = CredentialsRequest {
            email: "a@x.com".into(),
            password: String::new(),
        };
        assert!(matches!(
            validate(&mut empty_pw).unwrap_err(),
            AuthError::Validation(_)
        ));
    }
}
