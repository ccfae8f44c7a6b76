//! 核心中间件模块

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use std::time::Instant;
use tracing::info;

use super::error::CoreError;
use crate::app::auth::model::{AuthError, AuthUser};
use crate::app::AppState;

/// 请求日志中间件
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    let response = next.run(req).await;
    let status = response.status();
    let duration = start.elapsed();

    info!(
        "{} {} - {} - {}ms - User-Agent: {:?}",
        method,
        uri,
        status,
        duration.as_millis(),
        user_agent
    );

    response
}

/// 认证中间件
///
/// 从 cookie 中取出会话令牌并校验，成功后把 [`AuthUser`] 放进请求扩展，
/// 处理器通过 `Extension<AuthUser>` 取用。
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, CoreError> {
    let token = jar
        .get(state.tokens.cookie_name())
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let claims = state.tokens.verify(&token)?;
    req.extensions_mut().insert(AuthUser { email: claims.email });

    Ok(next.run(req).await)
}
