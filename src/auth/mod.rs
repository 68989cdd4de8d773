use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Token claims carried by a bearer token. `sub` is the subject identifier
/// that ownership checks compare against.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(subject: impl Into<String>, expiry_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.into(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,
    #[error("{0}")]
    MalformedHeader(String),
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),
    #[error("Token signing secret not configured")]
    MissingSecret,
}

/// Verifies an inbound bearer token and yields the subject identifier.
/// Injected into handlers through [`AppState`] so tests can substitute
/// their own signer.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<String, AuthError>;
}

/// HS256 JWT verifier.
pub struct JwtVerifier {
    secret: String,
}

impl JwtVerifier {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<String, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(token_data.claims.sub)
    }
}

/// Issue a signed token for a subject. Used by tooling and the test suite.
pub fn issue_token(subject: &str, secret: &str, expiry_hours: i64) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let claims = Claims::new(subject, expiry_hours);
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// Extract the bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers.get("authorization").ok_or(AuthError::MissingHeader)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::MalformedHeader("Invalid Authorization header format".into()))?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err(AuthError::MalformedHeader("Empty bearer token".into()));
        }
        Ok(token.to_string())
    } else {
        Err(AuthError::MalformedHeader(
            "Authorization header must use Bearer token format".into(),
        ))
    }
}

/// Authenticated caller, extracted from the Authorization header.
/// Declaring a `Subject` parameter is what makes a handler require auth.
#[derive(Debug, Clone)]
pub struct Subject {
    pub uid: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for Subject
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = extract_bearer_token(&parts.headers)?;
        let uid = state.verifier.verify(&token)?;
        Ok(Subject { uid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn issue_and_verify_roundtrip() {
        let token = issue_token("uid-12345", "secret", 1).unwrap();
        let verifier = JwtVerifier::new("secret".to_string());
        assert_eq!(verifier.verify(&token).unwrap(), "uid-12345");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token("uid-12345", "secret", 1).unwrap();
        let verifier = JwtVerifier::new("other".to_string());
        assert!(matches!(verifier.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn empty_secret_is_rejected() {
        let verifier = JwtVerifier::new(String::new());
        assert!(matches!(verifier.verify("whatever"), Err(AuthError::MissingSecret)));
    }

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert!(matches!(extract_bearer_token(&headers), Err(AuthError::MissingHeader)));

        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert!(matches!(extract_bearer_token(&headers), Err(AuthError::MalformedHeader(_))));

        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert!(matches!(extract_bearer_token(&headers), Err(AuthError::MalformedHeader(_))));

        headers.insert("authorization", HeaderValue::from_static("Bearer tok123"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), "tok123");
    }
}
