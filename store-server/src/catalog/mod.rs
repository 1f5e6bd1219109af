//! Catalog filter/sort composer
//!
//! Turns the raw listing query parameters into a [`CatalogFilter`] (a pure
//! filter-spec value) and folds the active filters into a dynamic WHERE
//! clause via [`QueryBuilder`]. Which filters are active is decided here as
//! data; the repository only executes the composed query.
//!
//! Parsing is deliberately forgiving: malformed numeric bounds and unknown
//! sort keys degrade to "absent" / "newest" instead of erroring, and no
//! filter combination can fail; an empty match is an empty list.

use serde::Deserialize;

use crate::db::query_builder::{QueryBuilder, escape_like};

/// Raw catalog listing query parameters, as received over HTTP.
///
/// Everything is optional and stringly-typed; [`CatalogFilter::from_query`]
/// owns the (lossy) interpretation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub team: Option<String>,
    pub size: Option<String>,
    pub search: Option<String>,
    /// String `"true"` / `"false"`; anything else counts as absent
    pub is_new: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort_by: Option<String>,
}

/// Sort order for the product listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    PriceAsc,
    PriceDesc,
    #[default]
    Newest,
}

impl SortBy {
    /// Parse a sort key; unknown values fall back to `newest`
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("price_asc") => Self::PriceAsc,
            Some("price_desc") => Self::PriceDesc,
            _ => Self::Newest,
        }
    }

    pub fn order_clause(&self) -> &'static str {
        match self {
            Self::PriceAsc => " ORDER BY price ASC",
            Self::PriceDesc => " ORDER BY price DESC",
            Self::Newest => " ORDER BY created_at DESC",
        }
    }
}

/// Validated catalog filter-spec; only present filters are applied
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub team: Option<String>,
    pub size: Option<String>,
    pub search: Option<String>,
    pub is_new: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_by: SortBy,
}

/// Parse a numeric bound; malformed or non-finite input means "no bound"
fn parse_price(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

impl CatalogFilter {
    /// Interpret the raw query parameters
    pub fn from_query(q: &CatalogQuery) -> Self {
        let is_new = match q.is_new.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };

        Self {
            category: q.category.clone().filter(|s| !s.is_empty()),
            team: q.team.clone().filter(|s| !s.is_empty()),
            size: q.size.clone().filter(|s| !s.is_empty()),
            search: q.search.clone().filter(|s| !s.is_empty()),
            is_new,
            min_price: parse_price(q.min_price.as_deref()),
            max_price: parse_price(q.max_price.as_deref()),
            sort_by: SortBy::from_param(q.sort_by.as_deref()),
        }
    }

    /// Fold the active filters into WHERE conditions (AND-combined)
    pub fn apply(&self, qb: &mut QueryBuilder) {
        if let Some(category) = &self.category {
            qb.add_condition("LOWER(category) = LOWER(?)")
                .bind_text(category.clone());
        }

        if let Some(team) = &self.team {
            qb.add_condition("LOWER(team) = LOWER(?)")
                .bind_text(team.clone());
        }

        if let Some(size) = &self.size {
            // Token membership in the comma-delimited size column: the
            // candidate must be the whole value, the first token, a middle
            // token, or the last token. LIKE wildcards in the candidate are
            // escaped so they cannot leak into the pattern.
            let escaped = escape_like(size);
            qb.add_condition(
                "(sizes = ? OR sizes LIKE ? ESCAPE '\\' OR sizes LIKE ? ESCAPE '\\' OR sizes LIKE ? ESCAPE '\\')",
            )
            .bind_text(size.clone())
            .bind_text(format!("{escaped},%"))
            .bind_text(format!("%,{escaped},%"))
            .bind_text(format!("%,{escaped}"));
        }

        if let Some(search) = &self.search {
            qb.add_search_condition(&["name", "description"], search);
        }

        if let Some(is_new) = self.is_new {
            qb.add_condition("is_new = ?")
                .bind_i64(if is_new { 1 } else { 0 });
        }

        if let Some(min) = self.min_price {
            qb.add_condition("price >= ?").bind_f64(min);
        }

        if let Some(max) = self.max_price {
            qb.add_condition("price <= ?").bind_f64(max);
        }
    }
}
