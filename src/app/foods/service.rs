//! 菜品业务服务

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::model::{CreateFoodRequest, Food, FoodPatch};
use crate::app::auth::model::AuthUser;
use crate::core::error::CoreError;
use crate::infrastructure::store::FoodStore;

/// 首页展示的热销数量
pub const TOP_FOODS_LIMIT: u64 = 6;

#[derive(Clone)]
pub struct FoodService {
    store: Arc<dyn FoodStore>,
}

impl FoodService {
    pub fn new(store: Arc<dyn FoodStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Food>, CoreError> {
        Ok(self.store.list_foods(skip, limit).await?)
    }

    pub async fn by_buyer(&self, email: &str) -> Result<Vec<Food>, CoreError> {
        Ok(self.store.foods_by_buyer(email).await?)
    }

    pub async fn count(&self) -> Result<u64, CoreError> {
        Ok(self.store.count_foods().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Food, CoreError> {
        self.store
            .find_food(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("food {} not found", id)))
    }

    pub async fn top(&self) -> Result<Vec<Food>, CoreError> {
        Ok(self.store.top_foods(TOP_FOODS_LIMIT).await?)
    }

    /// 上架菜品，卖家必须是当前登录用户
    pub async fn create(&self, user: &AuthUser, request: CreateFoodRequest) -> Result<Food, CoreError> {
        if !user.is(&request.seller_email) {
            return Err(CoreError::Forbidden);
        }

        let food = request.into_food();
        self.store.insert_food(&food).await?;
        info!("Created food {} ({}) for {}", food.name, food.id, food.seller_email);
        Ok(food)
    }

    /// 部分更新，只有卖家可以修改
    pub async fn update(&self, user: &AuthUser, id: Uuid, patch: &FoodPatch) -> Result<Food, CoreError> {
        self.ensure_owner(user, id).await?;

        if patch.is_empty() {
            return Err(CoreError::BadRequest("no fields to update".to_string()));
        }

        let food = self
            .store
            .update_food(id, patch)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("food {} not found", id)))?;
        info!("Updated food {}", id);
        Ok(food)
    }

    pub async fn delete(&self, user: &AuthUser, id: Uuid) -> Result<(), CoreError> {
        self.ensure_owner(user, id).await?;

        if !self.store.delete_food(id).await? {
            return Err(CoreError::NotFound(format!("food {} not found", id)));
        }
        info!("Deleted food {}", id);
        Ok(())
    }

    async fn ensure_owner(&self, user: &AuthUser, id: Uuid) -> Result<(), CoreError> {
        let food = self.get(id).await?;
        if !user.is(&food.seller_email) {
            return Err(CoreError::Forbidden);
        }
        Ok(())
    }
}
