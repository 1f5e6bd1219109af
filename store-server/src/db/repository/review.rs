//! Review Repository
//!
//! Reviews are append-only; adding one recomputes the parent product's
//! mean rating. The read-recompute-write on the product is intentionally
//! not wrapped in a transaction (last write wins), matching the observed
//! behavior of the original system.

use super::{RepoError, RepoResult, product};
use shared::models::{Review, ReviewCreate};
use sqlx::SqlitePool;

const REVIEW_SELECT: &str =
    "SELECT id, product_id, author, rating, comment, date, created_at FROM review";

/// All reviews for a product, newest first
pub async fn find_by_product(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<Review>> {
    let sql = format!("{REVIEW_SELECT} WHERE product_id = ? ORDER BY created_at DESC");
    let reviews = sqlx::query_as::<_, Review>(&sql)
        .bind(product_id)
        .fetch_all(pool)
        .await?;
    Ok(reviews)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Review>> {
    let sql = format!("{REVIEW_SELECT} WHERE id = ?");
    let review = sqlx::query_as::<_, Review>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(review)
}

/// Add a review to a product and refresh the product's mean rating
///
/// The review is stamped with the current calendar date (no time
/// component). The new rating is `round(mean * 10) / 10` over all reviews
/// including the one just added.
pub async fn add(pool: &SqlitePool, product_id: i64, data: ReviewCreate) -> RepoResult<Review> {
    if product::find_by_id(pool, product_id).await?.is_none() {
        return Err(RepoError::NotFound(format!(
            "Product {product_id} not found"
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO review (id, product_id, author, rating, comment, date, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(product_id)
    .bind(&data.author)
    .bind(data.rating)
    .bind(&data.comment)
    .bind(shared::util::today_date())
    .bind(now)
    .execute(pool)
    .await?;

    let mean: f64 = sqlx::query_scalar("SELECT AVG(rating) FROM review WHERE product_id = ?")
        .bind(product_id)
        .fetch_one(pool)
        .await?;
    let rating = (mean * 10.0).round() / 10.0;
    product::set_rating(pool, product_id, rating).await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create review".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::ProductCreate;

    async fn pool_with_product() -> (SqlitePool, i64) {
        let db = DbService::new_in_memory().await.unwrap();
        let product = product::create(
            &db.pool,
            ProductCreate {
                name: "Home 2024".to_string(),
                team: "Brasil".to_string(),
                price: 349.9,
                images: Vec::new(),
                description: "Camisa oficial".to_string(),
                is_new: Some(true),
                category: "Seleções".to_string(),
                sizes: vec!["P".to_string(), "M".to_string()],
                rating: None,
                stock: Some(50),
            },
            vec!["https://cdn.example.com/front.jpg".to_string()],
        )
        .await
        .unwrap();
        (db.pool, product.id)
    }

    fn review(rating: i64) -> ReviewCreate {
        ReviewCreate {
            author: "João Silva".to_string(),
            rating,
            comment: "Produto de excelente qualidade".to_string(),
        }
    }

    #[tokio::test]
    async fn first_review_sets_rating_to_its_own_value() {
        let (pool, product_id) = pool_with_product().await;

        let before = product::find_by_id(&pool, product_id).await.unwrap().unwrap();
        assert_eq!(before.rating, 0.0);

        add(&pool, product_id, review(4)).await.unwrap();
        let after = product::find_by_id(&pool, product_id).await.unwrap().unwrap();
        assert_eq!(after.rating, 4.0);
    }

    #[tokio::test]
    async fn mean_is_rounded_to_one_decimal() {
        let (pool, product_id) = pool_with_product().await;

        add(&pool, product_id, review(5)).await.unwrap();
        add(&pool, product_id, review(4)).await.unwrap();
        add(&pool, product_id, review(4)).await.unwrap();

        // mean(5, 4, 4) = 4.333.. -> 4.3
        let product = product::find_by_id(&pool, product_id).await.unwrap().unwrap();
        assert_eq!(product.rating, 4.3);
    }

    #[tokio::test]
    async fn add_review_to_missing_product_is_not_found() {
        let db = DbService::new_in_memory().await.unwrap();
        let result = add(&db.pool, 42, review(5)).await;
        assert!(matches!(result, Err(RepoError::NotFound(_))));
    }

    #[tokio::test]
    async fn reviews_are_stamped_with_calendar_date_and_listed_newest_first() {
        let (pool, product_id) = pool_with_product().await;

        let first = add(&pool, product_id, review(5)).await.unwrap();
        assert_eq!(first.date, shared::util::today_date());

        tokio::time::sleep(std::time::Duration::from_millis(3)).await;
        let second = add(&pool, product_id, review(3)).await.unwrap();

        let listed = find_by_product(&pool, product_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn deleting_product_cascades_reviews() {
        let (pool, product_id) = pool_with_product().await;
        add(&pool, product_id, review(5)).await.unwrap();

        product::delete(&pool, product_id).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM review WHERE product_id = ?")
            .bind(product_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
