//! 存活与健康检查

use axum::{extract::State, response::Json};

use super::AppState;
use crate::core::error::CoreError;

pub async fn root() -> &'static str {
    "Restaurant website is running"
}

pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, CoreError> {
    state.store.ping().await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "storage": state.store.backend(),
        "timestamp": chrono::Utc::now()
    })))
}
