//! 基础设施层：数据库、存储、日志

pub mod database;
pub mod logger;
pub mod store;
