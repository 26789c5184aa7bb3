use std::time::Duration;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{config::JwtConfig, error::AuthError};

/// Access-token payload: the subject is the user id. Rebuilt fresh on
/// every login, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

/// HS256 signing and verification keys derived from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // EncodingKey/DecodingKey hold secret material and don't implement
        // Debug; expose only the non-sensitive field.
        f.debug_struct("JwtKeys").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl JwtKeys {
    /// Build keys from config. An empty secret would sign tokens nothing
    /// can verify, so it is rejected here rather than at issuance time.
    pub fn from_config(cfg: &JwtConfig) -> Result<Self, AuthError> {
        if cfg.secret.trim().is_empty() {
            return Err(AuthError::Config("JWT_SECRET is missing or empty".into()));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: Duration::from_secs(cfg.ttl_minutes.max(0) as u64 * 60),
        })
    }

    /// Sign a token for the given user, expiring `ttl` after now.
    pub fn sign(&self, user_id: i64, email: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            email: email.to_owned(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        // No leeway: a token checked past its expiry is rejected.
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

/// Extracts and validates the bearer token, yielding the verified claims.
pub struct AuthUser(pub Claims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Missing Authorization header".to_string(),
            ))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or((
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header".to_string(),
        ))?;

        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(_) => {
                warn!("invalid or expired token");
                Err((
                    StatusCode::UNAUTHORIZED,
                    "Invalid or expired token".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str, ttl_minutes: i64) -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: secret.into(),
            ttl_minutes,
        })
        .expect("keys from non-empty secret")
    }

    #[test]
    fn sign_and_verify_carries_subject_and_email() {
        let keys = make_keys("dev-secret", 5);
        let token = keys.sign(42, "a@x.com").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp, claims.iat + 300);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = make_keys("dev-secret", 5);
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let stale = Claims {
            sub: 7,
            email: "a@x.com".into(),
            iat: (now - 360) as usize,
            exp: (now - 60) as usize,
        };
        let token = encode(&Header::default(), &stale, &keys.encoding).expect("encode");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let keys = make_keys("dev-secret", 5);
        assert!(keys.verify("not.a.token").is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let signer = make_keys("secret-one", 5);
        let verifier = make_keys("secret-two", 5);
        let token = signer.sign(1, "a@x.com").expect("sign");
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn empty_secret_is_a_config_error() {
        let err = JwtKeys::from_config(&JwtConfig {
            secret: "  ".into(),
            ttl_minutes: 5,
        })
        .unwrap_err();
        assert!(matches!(err, AuthError::Config(_)));
    }
}
