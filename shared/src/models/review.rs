//! Review Model

use serde::{Deserialize, Serialize};

/// Review entity (avaliação)
///
/// Created only through "add review to product"; never updated or deleted
/// on its own. `date` is a calendar date (`YYYY-MM-DD`), not a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub product_id: i64,
    pub author: String,
    /// Integer rating, 1-5
    pub rating: i64,
    pub comment: String,
    pub date: String,
    pub created_at: i64,
}

/// Create review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreate {
    pub author: String,
    pub rating: i64,
    pub comment: String,
}
