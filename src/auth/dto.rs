use serde::{Deserialize, Serialize};

/// Request body shared by signup and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Acknowledgement returned by signup.
#[derive(Debug, Serialize)]
pub struct Msg {
    pub message: String,
}

impl Msg {
    pub fn ok() -> Self {
        Self {
            message: "ok".into(),
        }
    }
}

/// Response returned by login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_uses_camel_case_key() {
        let body = TokenResponse {
            access_token: "abc".into(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"accessToken":"abc"}"#);
    }

    #[test]
    fn signup_ack_body() {
        let json = serde_json::to_string(&Msg::ok()).unwrap();
        assert_eq!(json, r#"{"message":"ok"}"#);
    }
}
