//! 订单：查询、下单、取消

pub mod handler;
pub mod model;
pub mod service;
