//! # 餐厅美食市集后端
//!
//! 提供菜品与订单的 HTTP 接口，受保护的接口通过 cookie 中的会话令牌认证。
//! - `app`：处理器、业务服务、路由
//! - `core`：错误、响应、中间件
//! - `infrastructure`：数据库、存储实现、日志
//! - `config`：配置加载与校验

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{create_router, AppState};
pub use config::Config;

use anyhow::Context;
use tracing::info;

use crate::config::StorageBackend;
use crate::infrastructure::{
    database::DatabaseManager,
    store::{MemoryStore, PgStore},
};

/// 按配置选择存储后端并构建应用状态
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Ok(AppState::new(MemoryStore::new(), config))
        }
        StorageBackend::Postgres => {
            let url = config
                .database
                .connection_url()
                .context("database url is not configured")?;

            let database = DatabaseManager::new(&url, &config.database)
                .await
                .context("failed to connect to database")?;
            database
                .create_tables()
                .await
                .context("failed to create tables")?;
            info!("Connected to PostgreSQL");

            Ok(AppState::new(PgStore::new(database.get_pool().clone()), config))
        }
    }
}
