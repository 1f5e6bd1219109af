//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity as exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Team / brand label (e.g. "Brasil", "Flamengo")
    pub team: String,
    pub price: f64,
    /// Image URLs, at least one at all times
    pub images: Vec<String>,
    pub description: String,
    pub is_new: bool,
    pub category: String,
    /// Available size labels (e.g. P, M, G, GG)
    pub sizes: Vec<String>,
    /// Mean review rating, 0-5, one decimal
    pub rating: f64,
    pub stock: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// DB row for `product`.
///
/// `images` and `sizes` are comma-delimited TEXT columns; the API model
/// carries them as vectors. Conversion owns the join/split.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub team: String,
    pub price: f64,
    pub images: String,
    pub description: String,
    pub is_new: bool,
    pub category: String,
    pub sizes: String,
    pub rating: f64,
    pub stock: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Join a list into its comma-delimited column form
pub fn join_list(items: &[String]) -> String {
    items.join(",")
}

/// Split a comma-delimited column back into a list, dropping empty tokens
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            team: row.team,
            price: row.price,
            images: split_list(&row.images),
            description: row.description,
            is_new: row.is_new,
            category: row.category,
            sizes: split_list(&row.sizes),
            rating: row.rating,
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub team: String,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    pub description: String,
    pub is_new: Option<bool>,
    pub category: String,
    pub sizes: Vec<String>,
    pub rating: Option<f64>,
    pub stock: Option<i64>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub team: Option<String>,
    pub price: Option<f64>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
    pub is_new: Option<bool>,
    pub category: Option<String>,
    pub sizes: Option<Vec<String>>,
    pub rating: Option<f64>,
    pub stock: Option<i64>,
}
