//! 数据库基础设施

use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Error,
};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn new(database_url: &str, config: &DatabaseConfig) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// 建表（幂等），不做版本化迁移
    pub async fn create_tables(&self) -> Result<(), Error> {
        info!("Creating database tables...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS foods (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                image TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT '',
                price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
                quantity INTEGER NOT NULL CHECK (quantity >= 0),
                order_count INTEGER NOT NULL DEFAULT 0 CHECK (order_count >= 0),
                origin TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                seller_name TEXT NOT NULL DEFAULT '',
                seller_email TEXT NOT NULL,
                buyer_email TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                id UUID PRIMARY KEY,
                food_id UUID NOT NULL,
                buyer_email TEXT NOT NULL,
                quantity INTEGER NOT NULL CHECK (quantity > 0),
                food_name TEXT NOT NULL,
                image TEXT NOT NULL DEFAULT '',
                price DOUBLE PRECISION NOT NULL,
                seller_email TEXT NOT NULL,
                ordered_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        for statement in [
            "CREATE INDEX IF NOT EXISTS foods_buyer_email_idx ON foods (buyer_email)",
            "CREATE INDEX IF NOT EXISTS foods_order_count_idx ON foods (order_count DESC)",
            "CREATE INDEX IF NOT EXISTS orders_buyer_email_idx ON orders (buyer_email)",
        ] {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        info!("Database tables ready");
        Ok(())
    }
}
