//! 会话认证：令牌签发、注销

pub mod handler;
pub mod model;
pub mod service;
