//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{User, UserRole};
use sqlx::SqlitePool;

const USER_SELECT: &str =
    "SELECT id, email, password_hash, name, phone, role, created_at, updated_at FROM user";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} ORDER BY created_at DESC");
    let users = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(users)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE email = ? LIMIT 1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Create a user. `password_hash` must already be hashed by the caller.
pub async fn create(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    name: &str,
    phone: Option<&str>,
    role: UserRole,
) -> RepoResult<User> {
    if find_by_email(pool, email).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Email {email} is already registered"
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO user (id, email, password_hash, name, phone, role, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(phone)
    .bind(role)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM user WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let db = DbService::new_in_memory().await.unwrap();
        create(&db.pool, "a@b.com", "hash", "A", None, UserRole::Client)
            .await
            .unwrap();
        let result = create(&db.pool, "a@b.com", "hash", "B", None, UserRole::Client).await;
        assert!(matches!(result, Err(RepoError::Duplicate(_))));
    }

    #[tokio::test]
    async fn lookup_by_email() {
        let db = DbService::new_in_memory().await.unwrap();
        let created = create(
            &db.pool,
            "a@b.com",
            "hash",
            "A",
            Some("11 91234-5678"),
            UserRole::Admin,
        )
        .await
        .unwrap();
        let found = find_by_email(&db.pool, "a@b.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.role, UserRole::Admin);
        assert!(find_by_email(&db.pool, "missing@b.com")
            .await
            .unwrap()
            .is_none());
    }
}
