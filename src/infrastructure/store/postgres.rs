//! PostgreSQL 存储

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{FoodStore, OrderStore, Store, StoreError};
use crate::app::foods::model::{Food, FoodPatch};
use crate::app::orders::model::Order;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FoodStore for PgStore {
    async fn list_foods(&self, skip: u64, limit: u64) -> Result<Vec<Food>, StoreError> {
        let foods = sqlx::query_as::<_, Food>(
            "SELECT * FROM foods ORDER BY created_at, id LIMIT $1 OFFSET $2",
        )
        .bind(limit as i64)
        .bind(skip as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(foods)
    }

    async fn foods_by_buyer(&self, buyer_email: &str) -> Result<Vec<Food>, StoreError> {
        let foods = sqlx::query_as::<_, Food>(
            "SELECT * FROM foods WHERE buyer_email = $1 ORDER BY created_at, id",
        )
        .bind(buyer_email)
        .fetch_all(&self.pool)
        .await?;
        Ok(foods)
    }

    async fn count_foods(&self) -> Result<u64, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM foods")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0.max(0) as u64)
    }

    async fn find_food(&self, id: Uuid) -> Result<Option<Food>, StoreError> {
        let food = sqlx::query_as::<_, Food>("SELECT * FROM foods WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(food)
    }

    async fn top_foods(&self, limit: u64) -> Result<Vec<Food>, StoreError> {
        let foods = sqlx::query_as::<_, Food>(
            "SELECT * FROM foods ORDER BY order_count DESC, created_at LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(foods)
    }

    async fn insert_food(&self, food: &Food) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO foods (id, name, image, category, price, quantity, order_count,
                               origin, description, seller_name, seller_email, buyer_email, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(food.id)
        .bind(&food.name)
        .bind(&food.image)
        .bind(&food.category)
        .bind(food.price)
        .bind(food.quantity)
        .bind(food.order_count)
        .bind(&food.origin)
        .bind(&food.description)
        .bind(&food.seller_name)
        .bind(&food.seller_email)
        .bind(&food.buyer_email)
        .bind(food.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_food(&self, id: Uuid, patch: &FoodPatch) -> Result<Option<Food>, StoreError> {
        // 未提供的字段保持原值
        let food = sqlx::query_as::<_, Food>(
            r#"
            UPDATE foods SET
                name = COALESCE($2, name),
                image = COALESCE($3, image),
                category = COALESCE($4, category),
                price = COALESCE($5, price),
                quantity = COALESCE($6, quantity),
                origin = COALESCE($7, origin),
                description = COALESCE($8, description),
                seller_name = COALESCE($9, seller_name),
                buyer_email = COALESCE($10, buyer_email)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.image)
        .bind(&patch.category)
        .bind(patch.price)
        .bind(patch.quantity)
        .bind(&patch.origin)
        .bind(&patch.description)
        .bind(&patch.seller_name)
        .bind(&patch.buyer_email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(food)
    }

    async fn delete_food(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM foods WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn orders_by_buyer(&self, buyer_email: &str) -> Result<Vec<Order>, StoreError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE buyer_email = $1 ORDER BY ordered_at",
        )
        .bind(buyer_email)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn place_order(&self, order: &Order) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        // 条件扣减：库存在同一条语句里复核
        let updated = sqlx::query(
            r#"
            UPDATE foods
            SET quantity = quantity - $1, order_count = order_count + 1
            WHERE id = $2 AND quantity >= $1
            "#,
        )
        .bind(order.quantity)
        .bind(order.food_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            debug!("Stock guard failed for food {}", order.food_id);
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO orders (id, food_id, buyer_email, quantity, food_name, image, price,
                                seller_email, ordered_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(order.id)
        .bind(order.food_id)
        .bind(&order.buyer_email)
        .bind(order.quantity)
        .bind(&order.food_name)
        .bind(&order.image)
        .bind(order.price)
        .bind(&order.seller_email)
        .bind(order.ordered_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn delete_order(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
