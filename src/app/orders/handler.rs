//! 订单处理器

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use super::model::{Order, OrdersQuery, PlaceOrderOutcome, PlaceOrderRequest};
use crate::app::auth::model::AuthUser;
use crate::app::AppState;
use crate::config::RejectionStatus;
use crate::core::{
    error::CoreError,
    response::{DeleteResult, InsertResult, MessageResponse},
};

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Vec<Order>>, CoreError> {
    Ok(Json(state.orders.orders_for(&user, &query.email).await?))
}

pub async fn place_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<PlaceOrderRequest>,
) -> Result<Response, CoreError> {
    payload.validate()?;

    let buyer_email = match payload.buyer_email {
        Some(email) if !user.is(&email) => return Err(CoreError::Forbidden),
        _ => user.email.clone(),
    };

    let outcome = state
        .orders
        .place_order(&buyer_email, payload.food_id, payload.quantity)
        .await?;

    let response = match outcome {
        PlaceOrderOutcome::Placed(order) => Json(InsertResult::new(order.id)).into_response(),
        PlaceOrderOutcome::Rejected(rejection) => {
            let status = match state.rejection_status {
                RejectionStatus::Ok => StatusCode::OK,
                RejectionStatus::Conflict => StatusCode::CONFLICT,
            };
            let body = MessageResponse {
                message: rejection.message(),
                reason: rejection.reason().to_string(),
            };
            (status, Json(body)).into_response()
        }
    };
    Ok(response)
}

pub async fn cancel_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResult>, CoreError> {
    state.orders.cancel_order(&user, id).await?;
    Ok(Json(DeleteResult::new(true)))
}
