//! 菜品数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 上架的菜品
///
/// 字段名沿用前端已有的 JSON 格式（`_id`、`seller_email`、`orderCount`）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Food {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub category: String,
    pub price: f64,
    pub quantity: i32,
    #[serde(rename = "orderCount")]
    pub order_count: i32,
    pub origin: String,
    pub description: String,
    pub seller_name: String,
    pub seller_email: String,
    pub buyer_email: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// 新建菜品请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFoodRequest {
    #[validate(length(min = 1, max = 200, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: i32,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub seller_name: String,
    #[validate(email(message = "seller_email must be a valid email"))]
    pub seller_email: String,
    #[validate(email(message = "buyer_email must be a valid email"))]
    pub buyer_email: Option<String>,
}

impl CreateFoodRequest {
    pub fn into_food(self) -> Food {
        Food {
            id: Uuid::new_v4(),
            name: self.name,
            image: self.image,
            category: self.category,
            price: self.price,
            quantity: self.quantity,
            order_count: 0,
            origin: self.origin,
            description: self.description,
            seller_name: self.seller_name,
            seller_email: self.seller_email,
            buyer_email: self.buyer_email,
            created_at: Utc::now(),
        }
    }
}

/// 部分更新
///
/// 没有 `_id`、`orderCount`、`seller_email` 字段，请求体里即使带了也会被忽略。
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct FoodPatch {
    #[validate(length(min = 1, max = 200, message = "name must not be empty"))]
    pub name: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: Option<i32>,
    pub origin: Option<String>,
    pub description: Option<String>,
    pub seller_name: Option<String>,
    #[validate(email(message = "buyer_email must be a valid email"))]
    pub buyer_email: Option<String>,
}

impl FoodPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.image.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.origin.is_none()
            && self.description.is_none()
            && self.seller_name.is_none()
            && self.buyer_email.is_none()
    }

    pub fn apply(&self, food: &mut Food) {
        if let Some(name) = &self.name {
            food.name = name.clone();
        }
        if let Some(image) = &self.image {
            food.image = image.clone();
        }
        if let Some(category) = &self.category {
            food.category = category.clone();
        }
        if let Some(price) = self.price {
            food.price = price;
        }
        if let Some(quantity) = self.quantity {
            food.quantity = quantity;
        }
        if let Some(origin) = &self.origin {
            food.origin = origin.clone();
        }
        if let Some(description) = &self.description {
            food.description = description.clone();
        }
        if let Some(seller_name) = &self.seller_name {
            food.seller_name = seller_name.clone();
        }
        if let Some(buyer_email) = &self.buyer_email {
            food.buyer_email = Some(buyer_email.clone());
        }
    }
}

/// 分页查询参数
#[derive(Debug, Default, Deserialize)]
pub struct ListFoodsQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
}

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

impl ListFoodsQuery {
    /// 返回 (skip, limit)；缺省或为 0 时使用默认值
    pub fn window(&self) -> (u64, u64) {
        let page = self.page.filter(|p| *p > 0).unwrap_or(1);
        let size = self
            .size
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        ((page - 1).saturating_mul(size), size)
    }
}
