use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    auth::{
        dto::{Msg, TokenResponse},
        jwt::JwtKeys,
        password,
        store::{StoreError, UserStore},
    },
    error::AuthError,
};

/// Orchestrates signup and login over a credential store and token keys.
/// Collaborators are passed at construction; there is no other state.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// Hash the password and insert the user. Only the duplicate-email case
    /// is translated; any other store failure passes through untouched.
    pub async fn signup(&self, email: &str, password: &str) -> Result<Msg, AuthError> {
        let hash = password::hash_password(password)?;
        match self.store.insert_user(email, &hash).await {
            Ok(user) => {
                info!(user_id = user.id, email = %user.email, "user registered");
                Ok(Msg::ok())
            }
            Err(StoreError::DuplicateEmail) => {
                warn!(%email, "signup rejected, email already registered");
                Err(AuthError::DuplicateAccount)
            }
            Err(e) => Err(AuthError::Store(e)),
        }
    }

    /// Look the user up, verify the password, issue a token. Unknown email
    /// and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let user = match self.store.find_by_email(email).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                warn!(%email, "login with unknown email");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(AuthError::Store(e)),
        };

        if !password::verify_password(password, &user.password_hash) {
            warn!(user_id = user.id, "login with invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.keys.sign(user.id, &user.email)?;
        info!(user_id = user.id, "user logged in");
        Ok(TokenResponse {
            access_token: token,
        })
    }
}
