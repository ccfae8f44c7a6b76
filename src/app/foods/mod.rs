//! 菜品：列表、详情、上架、修改、下架

pub mod handler;
pub mod model;
pub mod service;
