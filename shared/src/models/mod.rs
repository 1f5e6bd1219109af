//! Data models
//!
//! Shared between store-server and store-client (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY, snowflake-style).
//! API payloads serialize as camelCase to match the public interface.

pub mod address;
pub mod order;
pub mod product;
pub mod review;
pub mod user;

// Re-exports
pub use address::*;
pub use order::*;
pub use product::*;
pub use review::*;
pub use user::*;
