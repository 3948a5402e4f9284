use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use chrono::{Duration, Utc};

use crate::utils::error::{AppError, AppResult};

pub const SESSION_COOKIE: &str = "token";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Issues and verifies the signed session tokens carried in the `token` cookie.
#[derive(Clone)]
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn create_token(&self, user_id: &str) -> AppResult<String> {
        let expiration = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::InternalError("Session expiry out of range".to_string()))?
            .timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiration as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to create session token: {}", e)))
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }

    /// `Set-Cookie` value carrying a fresh session token.
    pub fn session_cookie(&self, token: &str) -> String {
        let mut cookie = base_cookie(token.to_string());
        cookie.set_max_age(time::Duration::seconds(self.ttl.num_seconds()));
        cookie.to_string()
    }

    pub fn cleared_cookie() -> String {
        let mut cookie = base_cookie(String::new());
        cookie.make_removal();
        cookie.to_string()
    }
}

fn base_cookie(value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_subject() {
        let sessions = SessionManager::new("test-secret", Duration::hours(1));
        let token = sessions.create_token("65f0c0ffee0000000000beef").unwrap();
        let claims = sessions.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "65f0c0ffee0000000000beef");
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let issuer = SessionManager::new("secret-a", Duration::hours(1));
        let verifier = SessionManager::new("secret-b", Duration::hours(1));
        let token = issuer.create_token("someone").unwrap();

        let err = verifier.verify_token(&token).unwrap_err();
        assert!(matches!(err, AppError::AuthenticationError(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let sessions = SessionManager::new("secret", Duration::hours(-2));
        let token = sessions.create_token("someone").unwrap();
        assert!(sessions.verify_token(&token).is_err());
    }

    #[test]
    fn cookie_carries_max_age() {
        let sessions = SessionManager::new("secret", Duration::days(30));
        let cookie = sessions.session_cookie("abc");
        assert!(cookie.starts_with("token=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/"));
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let cookie = SessionManager::cleared_cookie();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("HttpOnly"));
    }
}
