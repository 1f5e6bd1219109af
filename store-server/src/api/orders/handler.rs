//! Order API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_price, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{OrderCreate, OrderStatus, OrderUpdate, OrderWithItems};

/// Query params for the admin order list
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Filter by status (optional)
    pub status: Option<OrderStatus>,
}

fn validate_create(payload: &OrderCreate) -> AppResult<()> {
    if payload.items.is_empty() {
        return Err(AppError::validation("order must have at least one item"));
    }
    for item in &payload.items {
        validate_required_text(&item.product_name, "productName", MAX_NAME_LEN)?;
        validate_required_text(&item.product_team, "productTeam", MAX_NAME_LEN)?;
        validate_required_text(&item.product_image, "productImage", MAX_URL_LEN)?;
        validate_required_text(&item.size, "size", MAX_SHORT_TEXT_LEN)?;
        validate_price(item.unit_price, "unitPrice")?;
        if item.quantity < 1 {
            return Err(AppError::validation("quantity must be at least 1"));
        }
    }
    validate_required_text(&payload.shipping_address, "shippingAddress", MAX_ADDRESS_LEN)?;
    validate_required_text(&payload.shipping_city, "shippingCity", MAX_NAME_LEN)?;
    validate_required_text(&payload.shipping_state, "shippingState", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(
        &payload.shipping_zip_code,
        "shippingZipCode",
        MAX_SHORT_TEXT_LEN,
    )?;
    Ok(())
}

/// POST /api/orders - 创建订单
///
/// 普通用户只能为自己下单
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderWithItems>> {
    validate_create(&payload)?;
    if !current_user.is_admin() && payload.user_id != current_user.id {
        return Err(AppError::forbidden(
            "You can only place orders for yourself".to_string(),
        ));
    }

    let created = order::create(&state.pool, payload).await?;
    tracing::info!(
        order_id = created.order.id,
        user_id = created.order.user_id,
        total = created.order.total_price,
        "Order created"
    );
    Ok(Json(created))
}

/// GET /api/orders - 所有订单 (Admin, 可按状态筛选)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<OrderWithItems>>> {
    let orders = order::find_all(&state.pool, query.status).await?;
    Ok(Json(orders))
}

/// GET /api/orders/user/:user_id - 用户订单列表
///
/// 普通用户只能查看自己的订单
pub async fn list_by_user(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<OrderWithItems>>> {
    if !current_user.is_admin() && current_user.id != user_id {
        return Err(AppError::forbidden(
            "You can only view your own orders".to_string(),
        ));
    }
    let orders = order::find_by_user(&state.pool, user_id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 获取单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderWithItems>> {
    let found = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    if !current_user.is_admin() && found.order.user_id != current_user.id {
        // Hide other users' orders entirely
        return Err(AppError::not_found(format!("Order {id} not found")));
    }
    Ok(Json(found))
}

/// PUT /api/orders/:id - 更新订单状态/快递单号 (Admin)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<OrderWithItems>> {
    validate_optional_text(&payload.tracking_code, "trackingCode", MAX_SHORT_TEXT_LEN)?;
    let updated = order::update(&state.pool, id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/orders/:id - 删除订单 (Admin)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = order::delete(&state.pool, id).await?;
    Ok(Json(result))
}
