//! 会话令牌服务

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::error;

use super::model::{AuthError, Claims};
use crate::config::AuthConfig;

/// 签发与校验 HS256 会话令牌
#[derive(Clone)]
pub struct TokenService {
    secret: Arc<String>,
    ttl: Duration,
    cookie_name: Arc<String>,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, ttl_seconds: u64, cookie_name: impl Into<String>) -> Self {
        Self {
            secret: Arc::new(secret.into()),
            ttl: Duration::seconds(ttl_seconds as i64),
            cookie_name: Arc::new(cookie_name.into()),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.token_secret.clone(),
            config.token_ttl_seconds,
            config.cookie_name.clone(),
        )
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, email: &str) -> Result<String, AuthError> {
        self.issue_at(email, Utc::now())
    }

    /// 以指定签发时间生成令牌，过期时间为签发时间加有效期
    pub fn issue_at(&self, email: &str, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = Claims {
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(|e| {
            error!("Failed to encode session token: {}", e);
            AuthError::Signing(e.to_string())
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}
