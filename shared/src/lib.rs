//! Shared types for the storefront
//!
//! Data models and small utilities used by both `store-server` and
//! `store-client`. DB row types are gated behind the `db` feature so the
//! client never pulls in sqlx.

pub mod models;
pub mod util;
