//! 认证数据模型

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 会话令牌中的声明
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// 通过认证的请求身份，由认证中间件放入请求扩展
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
}

impl AuthUser {
    pub fn is(&self, email: &str) -> bool {
        self.email == email
    }
}

/// `POST /jwt` 请求体，其余字段忽略
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(email(message = "email must be a valid email"))]
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no session token")]
    MissingToken,
    #[error("invalid session token")]
    InvalidToken,
    #[error("session token expired")]
    TokenExpired,
    #[error("failed to sign session token: {0}")]
    Signing(String),
}
