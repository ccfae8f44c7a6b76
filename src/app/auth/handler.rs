//! 认证处理器

use axum::{extract::State, response::Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::info;
use validator::Validate;

use super::model::TokenRequest;
use crate::app::AppState;
use crate::core::{error::CoreError, response::SuccessResponse};

fn session_cookie(name: String, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
        .build()
}

/// 签发会话令牌并写入 cookie
pub async fn issue_token(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<TokenRequest>,
) -> Result<(CookieJar, Json<SuccessResponse>), CoreError> {
    payload.validate()?;

    let token = state.tokens.issue(&payload.email)?;
    info!("Issued session token for {}", payload.email);

    let cookie = session_cookie(state.tokens.cookie_name().to_string(), token);
    Ok((jar.add(cookie), Json(SuccessResponse::ok())))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<serde_json::Value>>,
) -> (CookieJar, Json<SuccessResponse>) {
    info!(
        "Logging out {}",
        body.map(|Json(v)| v.to_string()).unwrap_or_default()
    );

    // 请求里没有带 cookie 时也要下发清除指令
    let mut cookie = session_cookie(state.tokens.cookie_name().to_string(), String::new());
    cookie.make_removal();
    (jar.add(cookie), Json(SuccessResponse::ok()))
}
