//! 菜品处理器

use axum::{
    extract::{Path, Query, State},
    response::Json,
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use super::model::{CreateFoodRequest, Food, FoodPatch, ListFoodsQuery};
use crate::app::auth::model::AuthUser;
use crate::app::AppState;
use crate::core::{
    error::CoreError,
    response::{CountResponse, DeleteResult, InsertResult, UpdateResult},
};

pub async fn list_foods(
    State(state): State<AppState>,
    Query(query): Query<ListFoodsQuery>,
) -> Result<Json<Vec<Food>>, CoreError> {
    let (skip, limit) = query.window();
    Ok(Json(state.foods.list(skip, limit).await?))
}

pub async fn foods_by_buyer(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Food>>, CoreError> {
    Ok(Json(state.foods.by_buyer(&email).await?))
}

pub async fn count_foods(State(state): State<AppState>) -> Result<Json<CountResponse>, CoreError> {
    let count = state.foods.count().await?;
    Ok(Json(CountResponse { count }))
}

pub async fn get_food(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Food>, CoreError> {
    Ok(Json(state.foods.get(id).await?))
}

pub async fn top_foods(State(state): State<AppState>) -> Result<Json<Vec<Food>>, CoreError> {
    Ok(Json(state.foods.top().await?))
}

pub async fn create_food(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateFoodRequest>,
) -> Result<Json<InsertResult>, CoreError> {
    payload.validate()?;
    let food = state.foods.create(&user, payload).await?;
    Ok(Json(InsertResult::new(food.id)))
}

pub async fn update_food(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(patch): Json<FoodPatch>,
) -> Result<Json<UpdateResult>, CoreError> {
    patch.validate()?;
    state.foods.update(&user, id, &patch).await?;
    Ok(Json(UpdateResult::new(true)))
}

pub async fn delete_food(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResult>, CoreError> {
    state.foods.delete(&user, id).await?;
    Ok(Json(DeleteResult::new(true)))
}
