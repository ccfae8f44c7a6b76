//! 订单数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::foods::model::Food;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "foodId")]
    pub food_id: Uuid,
    pub buyer_email: String,
    pub quantity: i32,
    #[serde(rename = "foodName")]
    pub food_name: String,
    pub image: String,
    pub price: f64,
    pub seller_email: String,
    #[serde(rename = "orderedAt")]
    pub ordered_at: DateTime<Utc>,
}

impl Order {
    /// 以下单时刻的菜品信息生成订单
    pub fn for_food(food: &Food, buyer_email: &str, quantity: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            food_id: food.id,
            buyer_email: buyer_email.to_string(),
            quantity,
            food_name: food.name.clone(),
            image: food.image.clone(),
            price: food.price,
            seller_email: food.seller_email.clone(),
            ordered_at: Utc::now(),
        }
    }
}

/// 下单请求
#[derive(Debug, Deserialize, Validate)]
pub struct PlaceOrderRequest {
    #[serde(rename = "foodId")]
    pub food_id: Uuid,
    /// 缺省时使用当前登录身份
    #[validate(email(message = "buyer_email must be a valid email"))]
    pub buyer_email: Option<String>,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub email: String,
}

/// 业务规则拒绝，不是系统错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderRejection {
    OwnFood,
    InsufficientStock { available: i32, requested: i32 },
}

impl OrderRejection {
    pub fn reason(&self) -> &'static str {
        match self {
            OrderRejection::OwnFood => "own_food",
            OrderRejection::InsufficientStock { .. } => "insufficient_stock",
        }
    }

    pub fn message(&self) -> String {
        match self {
            OrderRejection::OwnFood => "You cannot buy your own food".to_string(),
            OrderRejection::InsufficientStock {
                available,
                requested,
            } => format!(
                "Not enough quantity available: requested {}, only {} left",
                requested, available
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaceOrderOutcome {
    Placed(Order),
    Rejected(OrderRejection),
}
