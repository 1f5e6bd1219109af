//! Address Repository
//!
//! Every lookup carries the owner in the predicate, so an address that
//! exists but belongs to someone else is indistinguishable from a missing
//! one (NotFound, never Forbidden).

use super::{RepoError, RepoResult};
use shared::models::{Address, AddressCreate, AddressUpdate};
use sqlx::SqlitePool;

const ADDRESS_SELECT: &str = "SELECT id, user_id, label, recipient, street, number, complement, district, city, state, zip, created_at, updated_at FROM address";

/// A user's addresses, newest first
pub async fn find_all_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Address>> {
    let sql = format!("{ADDRESS_SELECT} WHERE user_id = ? ORDER BY created_at DESC");
    let addresses = sqlx::query_as::<_, Address>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(addresses)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64, user_id: i64) -> RepoResult<Option<Address>> {
    let sql = format!("{ADDRESS_SELECT} WHERE id = ? AND user_id = ?");
    let address = sqlx::query_as::<_, Address>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(address)
}

pub async fn create(pool: &SqlitePool, user_id: i64, data: AddressCreate) -> RepoResult<Address> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO address (id, user_id, label, recipient, street, number, complement, district, city, state, zip, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
    )
    .bind(id)
    .bind(user_id)
    .bind(&data.label)
    .bind(&data.recipient)
    .bind(&data.street)
    .bind(&data.number)
    .bind(&data.complement)
    .bind(&data.district)
    .bind(&data.city)
    .bind(&data.state)
    .bind(&data.zip)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id, user_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create address".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
    data: AddressUpdate,
) -> RepoResult<Address> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE address SET label = COALESCE(?1, label), recipient = COALESCE(?2, recipient), street = COALESCE(?3, street), number = COALESCE(?4, number), complement = COALESCE(?5, complement), district = COALESCE(?6, district), city = COALESCE(?7, city), state = COALESCE(?8, state), zip = COALESCE(?9, zip), updated_at = ?10 WHERE id = ?11 AND user_id = ?12",
    )
    .bind(&data.label)
    .bind(&data.recipient)
    .bind(&data.street)
    .bind(&data.number)
    .bind(&data.complement)
    .bind(&data.district)
    .bind(&data.city)
    .bind(&data.state)
    .bind(&data.zip)
    .bind(now)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Address {id} not found")));
    }
    find_by_id(pool, id, user_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Address {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64, user_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM address WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Address {id} not found")));
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn seed_user(pool: &SqlitePool, id: i64) {
        let now = shared::util::now_millis();
        sqlx::query(
            "INSERT INTO user (id, email, password_hash, name, role, created_at, updated_at) VALUES (?1, ?2, 'x', 'Cliente', 'client', ?3, ?3)",
        )
        .bind(id)
        .bind(format!("user{id}@example.com"))
        .bind(now)
        .execute(pool)
        .await
        .unwrap();
    }

    fn payload(label: Option<&str>) -> AddressCreate {
        AddressCreate {
            label: label.map(str::to_string),
            recipient: "João Silva".to_string(),
            street: "Rua Exemplo".to_string(),
            number: "123".to_string(),
            complement: None,
            district: "Centro".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            zip: "01234-567".to_string(),
        }
    }

    #[tokio::test]
    async fn cross_owner_access_is_not_found() {
        let db = DbService::new_in_memory().await.unwrap();
        seed_user(&db.pool, 1).await;
        seed_user(&db.pool, 2).await;

        let created = create(&db.pool, 1, payload(Some("Casa"))).await.unwrap();

        // Owner sees it
        assert!(find_by_id(&db.pool, created.id, 1).await.unwrap().is_some());
        // Someone else does not
        assert!(find_by_id(&db.pool, created.id, 2).await.unwrap().is_none());
        assert!(matches!(
            update(&db.pool, created.id, 2, AddressUpdate {
                label: Some("Trabalho".to_string()),
                recipient: None,
                street: None,
                number: None,
                complement: None,
                district: None,
                city: None,
                state: None,
                zip: None,
            })
            .await,
            Err(RepoError::NotFound(_))
        ));
        assert!(matches!(
            delete(&db.pool, created.id, 2).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_is_scoped_and_newest_first() {
        let db = DbService::new_in_memory().await.unwrap();
        seed_user(&db.pool, 1).await;
        seed_user(&db.pool, 2).await;

        create(&db.pool, 1, payload(Some("Casa"))).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(3)).await;
        create(&db.pool, 1, payload(Some("Trabalho"))).await.unwrap();
        create(&db.pool, 2, payload(None)).await.unwrap();

        let mine = find_all_by_user(&db.pool, 1).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].label.as_deref(), Some("Trabalho"));
        assert_eq!(mine[1].label.as_deref(), Some("Casa"));
    }
}
