//! Address API Handlers
//!
//! Every operation is scoped to the authenticated owner; an address under
//! another owner is reported as NotFound, never Forbidden.

use axum::{
    Json,
    extract::{Extension, Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::address;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{Address, AddressCreate, AddressUpdate};

fn validate_create(payload: &AddressCreate) -> AppResult<()> {
    validate_optional_text(&payload.label, "label", MAX_NAME_LEN)?;
    validate_required_text(&payload.recipient, "recipient", MAX_NAME_LEN)?;
    validate_required_text(&payload.street, "street", MAX_ADDRESS_LEN)?;
    validate_required_text(&payload.number, "number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.complement, "complement", MAX_ADDRESS_LEN)?;
    validate_required_text(&payload.district, "district", MAX_NAME_LEN)?;
    validate_required_text(&payload.city, "city", MAX_NAME_LEN)?;
    validate_required_text(&payload.state, "state", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.zip, "zip", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

fn validate_update(payload: &AddressUpdate) -> AppResult<()> {
    validate_optional_text(&payload.label, "label", MAX_NAME_LEN)?;
    if let Some(recipient) = &payload.recipient {
        validate_required_text(recipient, "recipient", MAX_NAME_LEN)?;
    }
    if let Some(street) = &payload.street {
        validate_required_text(street, "street", MAX_ADDRESS_LEN)?;
    }
    validate_optional_text(&payload.number, "number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.complement, "complement", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.district, "district", MAX_NAME_LEN)?;
    validate_optional_text(&payload.city, "city", MAX_NAME_LEN)?;
    validate_optional_text(&payload.state, "state", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.zip, "zip", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

/// GET /api/addresses - 当前用户的收货地址
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Address>>> {
    let addresses = address::find_all_by_user(&state.pool, current_user.id).await?;
    Ok(Json(addresses))
}

/// GET /api/addresses/:id - 获取单个地址
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Address>> {
    let found = address::find_by_id(&state.pool, id, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Address {id} not found")))?;
    Ok(Json(found))
}

/// POST /api/addresses - 新建地址
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<AddressCreate>,
) -> AppResult<Json<Address>> {
    validate_create(&payload)?;
    let created = address::create(&state.pool, current_user.id, payload).await?;
    Ok(Json(created))
}

/// PUT /api/addresses/:id - 更新地址
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<AddressUpdate>,
) -> AppResult<Json<Address>> {
    validate_update(&payload)?;
    let updated = address::update(&state.pool, id, current_user.id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/addresses/:id - 删除地址
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = address::delete(&state.pool, id, current_user.id).await?;
    Ok(Json(result))
}
