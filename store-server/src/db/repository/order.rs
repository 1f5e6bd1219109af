//! Order Repository
//!
//! Orders snapshot product identity into their items at creation; items
//! are immutable afterwards. Money math runs through `rust_decimal` and is
//! stored rounded to 2 decimal places.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderCreate, OrderItem, OrderStatus, OrderUpdate, OrderWithItems};

const ORDER_SELECT: &str = "SELECT id, user_id, total_price, status, shipping_address, shipping_city, shipping_state, shipping_zip_code, tracking_code, created_at, updated_at FROM orders";
const ITEM_SELECT: &str = "SELECT id, order_id, product_id, product_name, product_team, product_image, size, quantity, unit_price, subtotal FROM order_item";

/// Decimal from an f64 price; invalid floats degrade to zero
fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Line subtotal: unit price × quantity, 2dp
fn line_subtotal(unit_price: f64, quantity: i64) -> f64 {
    to_f64((to_decimal(unit_price) * Decimal::from(quantity)).round_dp(2))
}

async fn items_for_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let sql = format!("{ITEM_SELECT} WHERE order_id = ? ORDER BY id");
    let items = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .fetch_all(pool)
        .await?;
    Ok(items)
}

async fn with_items(pool: &SqlitePool, orders: Vec<Order>) -> RepoResult<Vec<OrderWithItems>> {
    let mut result = Vec::with_capacity(orders.len());
    for order in orders {
        let items = items_for_order(pool, order.id).await?;
        result.push(OrderWithItems { order, items });
    }
    Ok(result)
}

/// Create an order with its items; total = Σ unit_price × quantity
pub async fn create(pool: &SqlitePool, data: OrderCreate) -> RepoResult<OrderWithItems> {
    if data.items.is_empty() {
        return Err(RepoError::Validation("order has no items".into()));
    }
    for item in &data.items {
        if item.quantity < 1 {
            return Err(RepoError::Validation(format!(
                "quantity must be at least 1 for product {}",
                item.product_id
            )));
        }
    }

    let total: Decimal = data
        .items
        .iter()
        .map(|i| to_decimal(i.unit_price) * Decimal::from(i.quantity))
        .sum();
    let total_price = to_f64(total.round_dp(2));

    let now = shared::util::now_millis();
    let order_id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO orders (id, user_id, total_price, status, shipping_address, shipping_city, shipping_state, shipping_zip_code, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
    )
    .bind(order_id)
    .bind(data.user_id)
    .bind(total_price)
    .bind(OrderStatus::Pending)
    .bind(&data.shipping_address)
    .bind(&data.shipping_city)
    .bind(&data.shipping_state)
    .bind(&data.shipping_zip_code)
    .bind(now)
    .execute(pool)
    .await?;

    for item in &data.items {
        sqlx::query(
            "INSERT INTO order_item (id, order_id, product_id, product_name, product_team, product_image, size, quantity, unit_price, subtotal) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(shared::util::snowflake_id())
        .bind(order_id)
        .bind(item.product_id)
        .bind(&item.product_name)
        .bind(&item.product_team)
        .bind(&item.product_image)
        .bind(&item.size)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(line_subtotal(item.unit_price, item.quantity))
        .execute(pool)
        .await?;
    }

    find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// All orders, newest first, optionally filtered by status
pub async fn find_all(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
) -> RepoResult<Vec<OrderWithItems>> {
    let orders = match status {
        Some(status) => {
            let sql = format!("{ORDER_SELECT} WHERE status = ? ORDER BY created_at DESC");
            sqlx::query_as::<_, Order>(&sql)
                .bind(status)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{ORDER_SELECT} ORDER BY created_at DESC");
            sqlx::query_as::<_, Order>(&sql).fetch_all(pool).await?
        }
    };
    with_items(pool, orders).await
}

/// A user's orders, newest first
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<OrderWithItems>> {
    let sql = format!("{ORDER_SELECT} WHERE user_id = ? ORDER BY created_at DESC");
    let orders = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    with_items(pool, orders).await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderWithItems>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match order {
        Some(order) => {
            let items = items_for_order(pool, order.id).await?;
            Ok(Some(OrderWithItems { order, items }))
        }
        None => Ok(None),
    }
}

/// Update status / tracking code only; items are immutable
pub async fn update(pool: &SqlitePool, id: i64, data: OrderUpdate) -> RepoResult<OrderWithItems> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET status = COALESCE(?1, status), tracking_code = COALESCE(?2, tracking_code), updated_at = ?3 WHERE id = ?4",
    )
    .bind(data.status)
    .bind(&data.tracking_code)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Delete an order and its items
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::OrderItemCreate;

    fn item(product_id: i64, size: &str, quantity: i64, unit_price: f64) -> OrderItemCreate {
        OrderItemCreate {
            product_id,
            product_name: "Home 2024".to_string(),
            product_team: "Brasil".to_string(),
            product_image: "https://cdn.example.com/front.jpg".to_string(),
            size: size.to_string(),
            quantity,
            unit_price,
        }
    }

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

    fn order_payload(user_id: i64, items: Vec<OrderItemCreate>) -> OrderCreate {
        OrderCreate {
            user_id,
            items,
            shipping_address: "Rua Exemplo, 123".to_string(),
            shipping_city: "São Paulo".to_string(),
            shipping_state: "SP".to_string(),
            shipping_zip_code: "01234-567".to_string(),
        }
    }

    #[tokio::test]
    async fn create_computes_total_and_subtotals() {
        let db = DbService::new_in_memory().await.unwrap();
        seed_user(&db.pool, 1).await;
        let created = create(
            &db.pool,
            order_payload(1, vec![item(10, "M", 2, 349.9), item(11, "G", 1, 99.9)]),
        )
        .await
        .unwrap();

        assert_eq!(created.order.status, OrderStatus::Pending);
        assert_eq!(created.order.total_price, 799.7);
        assert_eq!(created.items.len(), 2);
        assert_eq!(created.items[0].subtotal, 699.8);
        assert_eq!(created.items[1].subtotal, 99.9);
    }

    #[tokio::test]
    async fn create_rejects_empty_and_zero_quantity() {
        let db = DbService::new_in_memory().await.unwrap();
        seed_user(&db.pool, 1).await;
        assert!(matches!(
            create(&db.pool, order_payload(1, Vec::new())).await,
            Err(RepoError::Validation(_))
        ));
        assert!(matches!(
            create(&db.pool, order_payload(1, vec![item(10, "M", 0, 10.0)])).await,
            Err(RepoError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn update_touches_only_status_and_tracking() {
        let db = DbService::new_in_memory().await.unwrap();
        seed_user(&db.pool, 1).await;
        let created = create(&db.pool, order_payload(1, vec![item(10, "M", 1, 100.0)]))
            .await
            .unwrap();

        let updated = update(
            &db.pool,
            created.order.id,
            OrderUpdate {
                status: Some(OrderStatus::Shipped),
                tracking_code: Some("BR123456789".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.order.status, OrderStatus::Shipped);
        assert_eq!(updated.order.tracking_code.as_deref(), Some("BR123456789"));
        assert_eq!(updated.order.total_price, 100.0);
        assert_eq!(updated.items.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_items_too() {
        let db = DbService::new_in_memory().await.unwrap();
        seed_user(&db.pool, 1).await;
        let created = create(&db.pool, order_payload(1, vec![item(10, "M", 1, 100.0)]))
            .await
            .unwrap();

        delete(&db.pool, created.order.id).await.unwrap();
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_item")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn status_filter_applies() {
        let db = DbService::new_in_memory().await.unwrap();
        seed_user(&db.pool, 1).await;
        seed_user(&db.pool, 2).await;
        let a = create(&db.pool, order_payload(1, vec![item(10, "M", 1, 100.0)]))
            .await
            .unwrap();
        create(&db.pool, order_payload(2, vec![item(11, "G", 1, 50.0)]))
            .await
            .unwrap();
        update(
            &db.pool,
            a.order.id,
            OrderUpdate {
                status: Some(OrderStatus::Delivered),
                tracking_code: None,
            },
        )
        .await
        .unwrap();

        let delivered = find_all(&db.pool, Some(OrderStatus::Delivered)).await.unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].order.id, a.order.id);

        let all = find_all(&db.pool, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
