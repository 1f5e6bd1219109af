//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口 (登录、注册)
//! - [`users`] - 用户管理接口 (Admin)
//! - [`products`] - 商品目录接口 (含评价)
//! - [`orders`] - 订单接口
//! - [`addresses`] - 收货地址接口

pub mod addresses;
pub mod auth;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::AppResult;
