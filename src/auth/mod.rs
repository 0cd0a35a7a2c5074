use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session token claims as issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// External identity id
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: impl Into<String>, email: Option<String>, expiry_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: sub.into(),
            email,
            name: None,
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Authenticated session attached to a request by the session middleware
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Session secret not configured")]
    MissingSecret,

    #[error("Invalid session token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// Sign a session token. Used by the CLI and tests; production tokens come from
/// the identity provider.
pub fn issue_session_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }
    let key = EncodingKey::from_secret(secret.as_bytes());
    Ok(encode(&Header::new(Algorithm::HS256), claims, &key)?)
}

/// Verify signature and expiry of a session token
pub fn verify_session_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }
    let key = DecodingKey::from_secret(secret.as_bytes());
    let data = decode::<Claims>(token, &key, &Validation::new(Algorithm::HS256))?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn verifies_tokens_it_issued() {
        let claims = Claims::new("user_123", Some("a@example.com".into()), 1);
        let token = issue_session_token(&claims, SECRET).unwrap();
        let decoded = verify_session_token(&token, SECRET).unwrap();
        assert_eq!(decoded.sub, "user_123");
        assert_eq!(decoded.email.as_deref(), Some("a@example.com"));
    }

    #[test]
    fn rejects_wrong_secret_and_expired_tokens() {
        let token = issue_session_token(&Claims::new("user_123", None, 1), SECRET).unwrap();
        assert!(verify_session_token(&token, "other-secret").is_err());

        let expired = issue_session_token(&Claims::new("user_123", None, -2), SECRET).unwrap();
        assert!(matches!(verify_session_token(&expired, SECRET), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn refuses_to_work_without_secret() {
        let claims = Claims::new("user_123", None, 1);
        assert!(matches!(issue_session_token(&claims, ""), Err(JwtError::MissingSecret)));
        assert!(matches!(verify_session_token("abc", ""), Err(JwtError::MissingSecret)));
    }
}
