//! 数据存储抽象
//!
//! 处理器和服务只依赖这里的 trait，具体实现（PostgreSQL / 内存）在启动时注入。

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::app::foods::model::{Food, FoodPatch};
use crate::app::orders::model::Order;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("duplicate id: {0}")]
    Duplicate(Uuid),
    #[error("order counter overflow for food {0}")]
    CounterOverflow(Uuid),
}

#[async_trait]
pub trait FoodStore: Send + Sync {
    async fn list_foods(&self, skip: u64, limit: u64) -> Result<Vec<Food>, StoreError>;

    async fn foods_by_buyer(&self, buyer_email: &str) -> Result<Vec<Food>, StoreError>;

    async fn count_foods(&self) -> Result<u64, StoreError>;

    async fn find_food(&self, id: Uuid) -> Result<Option<Food>, StoreError>;

    /// 按 `order_count` 降序
    async fn top_foods(&self, limit: u64) -> Result<Vec<Food>, StoreError>;

    async fn insert_food(&self, food: &Food) -> Result<(), StoreError>;

    /// 返回更新后的菜品，不存在时返回 `None`
    async fn update_food(&self, id: Uuid, patch: &FoodPatch) -> Result<Option<Food>, StoreError>;

    async fn delete_food(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn orders_by_buyer(&self, buyer_email: &str) -> Result<Vec<Order>, StoreError>;

    async fn find_order(&self, id: Uuid) -> Result<Option<Order>, StoreError>;

    /// 原子地完成下单：库存足够时扣减 `order.quantity`、`order_count` 加一并写入订单。
    ///
    /// 库存在写入时复核；不足（或菜品已被删除）时什么都不写，返回 `false`。
    async fn place_order(&self, order: &Order) -> Result<bool, StoreError>;

    async fn delete_order(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// 同时提供菜品和订单存储的后端
#[async_trait]
pub trait Store: FoodStore + OrderStore {
    /// 后端名称，用于健康检查
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), StoreError>;
}
