//! Product Repository

use super::{RepoError, RepoResult};
use crate::catalog::CatalogFilter;
use crate::db::query_builder::QueryBuilder;
use shared::models::{Product, ProductCreate, ProductRow, ProductUpdate, join_list};
use sqlx::SqlitePool;

const PRODUCT_SELECT: &str = "SELECT id, name, team, price, images, description, is_new, category, sizes, rating, stock, created_at, updated_at FROM product";

/// Find products matching a catalog filter-spec, in its sort order
pub async fn find_with_filters(
    pool: &SqlitePool,
    filter: &CatalogFilter,
) -> RepoResult<Vec<Product>> {
    let mut qb = QueryBuilder::new();
    filter.apply(&mut qb);

    let sql = format!(
        "{}{}{}",
        PRODUCT_SELECT,
        qb.build_where_clause(),
        filter.sort_by.order_clause()
    );
    let query = qb.apply_bindings_as(sqlx::query_as::<_, ProductRow>(&sql));
    let rows = query.fetch_all(pool).await?;
    Ok(rows.into_iter().map(Product::from).collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Product::from))
}

/// Create a product. `images` must already be resolved (non-empty).
pub async fn create(
    pool: &SqlitePool,
    data: ProductCreate,
    images: Vec<String>,
) -> RepoResult<Product> {
    if images.is_empty() {
        return Err(RepoError::Validation(
            "at least one image is required".into(),
        ));
    }
    if data.sizes.is_empty() {
        return Err(RepoError::Validation("sizes cannot be empty".into()));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO product (id, name, team, price, images, description, is_new, category, sizes, rating, stock, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.team)
    .bind(data.price)
    .bind(join_list(&images))
    .bind(&data.description)
    .bind(data.is_new.unwrap_or(false))
    .bind(&data.category)
    .bind(join_list(&data.sizes))
    .bind(data.rating.unwrap_or(0.0))
    .bind(data.stock.unwrap_or(0))
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Update a product. `images`, when present, must already be resolved.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: ProductUpdate,
    images: Option<Vec<String>>,
) -> RepoResult<Product> {
    if let Some(images) = &images
        && images.is_empty()
    {
        return Err(RepoError::Validation(
            "at least one image is required".into(),
        ));
    }
    if let Some(sizes) = &data.sizes
        && sizes.is_empty()
    {
        return Err(RepoError::Validation("sizes cannot be empty".into()));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE product SET name = COALESCE(?1, name), team = COALESCE(?2, team), price = COALESCE(?3, price), images = COALESCE(?4, images), description = COALESCE(?5, description), is_new = COALESCE(?6, is_new), category = COALESCE(?7, category), sizes = COALESCE(?8, sizes), rating = COALESCE(?9, rating), stock = COALESCE(?10, stock), updated_at = ?11 WHERE id = ?12",
    )
    .bind(&data.name)
    .bind(&data.team)
    .bind(data.price)
    .bind(images.as_deref().map(join_list))
    .bind(&data.description)
    .bind(data.is_new)
    .bind(&data.category)
    .bind(data.sizes.as_deref().map(join_list))
    .bind(data.rating)
    .bind(data.stock)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Hard delete a product; its reviews cascade with it
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(true)
}

/// Overwrite the stored mean rating (review aggregation)
pub async fn set_rating(pool: &SqlitePool, id: i64, rating: f64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE product SET rating = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(rating)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogFilter, SortBy};
    use crate::db::DbService;

    fn sample(name: &str, team: &str, category: &str, price: f64, sizes: &str) -> ProductCreate {
        ProductCreate {
            name: name.to_string(),
            team: team.to_string(),
            price,
            images: vec!["https://cdn.example.com/front.jpg".to_string()],
            description: format!("Camisa oficial {team}"),
            is_new: Some(false),
            category: category.to_string(),
            sizes: sizes.split(',').map(str::to_string).collect(),
            rating: None,
            stock: Some(10),
        }
    }

    async fn seeded_pool() -> SqlitePool {
        let db = DbService::new_in_memory().await.unwrap();
        let pool = db.pool;
        for (name, team, category, price, sizes) in [
            ("Home 2024", "Brasil", "Seleções", 300.0, "P,M,G"),
            ("Away 2024", "Brasil", "Seleções", 100.0, "M,GG"),
            ("Third Kit", "Flamengo", "clubes", 200.0, "G"),
        ] {
            let images = vec!["https://cdn.example.com/front.jpg".to_string()];
            create(&pool, sample(name, team, category, price, sizes), images)
                .await
                .unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn size_filter_matches_tokens_not_substrings() {
        let pool = seeded_pool().await;

        let mut filter = CatalogFilter {
            size: Some("M".to_string()),
            ..Default::default()
        };
        let found = find_with_filters(&pool, &filter).await.unwrap();
        let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
        assert!(names.contains(&"Home 2024"));
        assert!(names.contains(&"Away 2024"));
        // "M" must not match the "GG" token of Third Kit
        assert!(!names.contains(&"Third Kit"));

        // End-token and whole-value matches
        filter.size = Some("G".to_string());
        let found = find_with_filters(&pool, &filter).await.unwrap();
        let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
        assert!(names.contains(&"Home 2024"));
        assert!(names.contains(&"Third Kit"));
        assert!(!names.contains(&"Away 2024"));

        // No token matches
        filter.size = Some("X".to_string());
        assert!(find_with_filters(&pool, &filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn category_filter_is_case_insensitive_exact() {
        let pool = seeded_pool().await;
        let filter = CatalogFilter {
            category: Some("Clubes".to_string()),
            ..Default::default()
        };
        let found = find_with_filters(&pool, &filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Third Kit");

        let filter = CatalogFilter {
            category: Some("Clubes FC".to_string()),
            ..Default::default()
        };
        assert!(find_with_filters(&pool, &filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn price_sort_ascending() {
        let pool = seeded_pool().await;
        let filter = CatalogFilter {
            sort_by: SortBy::PriceAsc,
            ..Default::default()
        };
        let found = find_with_filters(&pool, &filter).await.unwrap();
        let prices: Vec<f64> = found.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![100.0, 200.0, 300.0]);
    }

    #[tokio::test]
    async fn price_bounds_are_inclusive() {
        let pool = seeded_pool().await;
        let filter = CatalogFilter {
            min_price: Some(100.0),
            max_price: Some(200.0),
            sort_by: SortBy::PriceAsc,
            ..Default::default()
        };
        let found = find_with_filters(&pool, &filter).await.unwrap();
        let prices: Vec<f64> = found.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![100.0, 200.0]);
    }

    #[tokio::test]
    async fn search_matches_name_or_description() {
        let pool = seeded_pool().await;
        let filter = CatalogFilter {
            search: Some("flamengo".to_string()),
            ..Default::default()
        };
        let found = find_with_filters(&pool, &filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].team, "Flamengo");
    }

    #[tokio::test]
    async fn create_rejects_empty_images() {
        let db = DbService::new_in_memory().await.unwrap();
        let result = create(
            &db.pool,
            sample("Kit", "Santos", "Clubes", 150.0, "M"),
            Vec::new(),
        )
        .await;
        assert!(matches!(result, Err(RepoError::Validation(_))));
    }
}
