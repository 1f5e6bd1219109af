//! Product API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};

use crate::auth::CurrentUser;
use crate::catalog::{CatalogFilter, CatalogQuery};
use crate::core::ServerState;
use crate::db::repository::{product, review};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_price, validate_rating,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{Product, ProductCreate, ProductUpdate, Review, ReviewCreate};

fn validate_images(images: &[String]) -> AppResult<()> {
    for url in images {
        validate_required_text(url, "image", MAX_URL_LEN)?;
    }
    Ok(())
}

fn validate_sizes(sizes: &[String]) -> AppResult<()> {
    for size in sizes {
        validate_required_text(size, "size", MAX_SHORT_TEXT_LEN)?;
        if size.contains(',') {
            return Err(AppError::validation(format!(
                "size label must not contain a comma: {size}"
            )));
        }
    }
    Ok(())
}

fn validate_create(payload: &ProductCreate) -> AppResult<()> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.team, "team", MAX_NAME_LEN)?;
    validate_required_text(&payload.category, "category", MAX_NAME_LEN)?;
    validate_required_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_price(payload.price, "price")?;
    validate_images(&payload.images)?;
    validate_sizes(&payload.sizes)?;
    if let Some(rating) = payload.rating
        && !(0.0..=5.0).contains(&rating)
    {
        return Err(AppError::validation("rating must be between 0 and 5"));
    }
    Ok(())
}

fn validate_update(payload: &ProductUpdate) -> AppResult<()> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(team) = &payload.team {
        validate_required_text(team, "team", MAX_NAME_LEN)?;
    }
    if let Some(category) = &payload.category {
        validate_required_text(category, "category", MAX_NAME_LEN)?;
    }
    if let Some(description) = &payload.description {
        validate_required_text(description, "description", MAX_NOTE_LEN)?;
    }
    if let Some(price) = payload.price {
        validate_price(price, "price")?;
    }
    if let Some(images) = &payload.images {
        validate_images(images)?;
    }
    if let Some(sizes) = &payload.sizes {
        validate_sizes(sizes)?;
    }
    Ok(())
}

/// Resolve the image list for a write: payload images, else the product's
/// current images. An empty result is a validation error: a product must
/// always carry at least one image.
fn resolve_images(
    payload_images: Option<&[String]>,
    current_images: Option<&[String]>,
) -> AppResult<Vec<String>> {
    if let Some(images) = payload_images
        && !images.is_empty()
    {
        return Ok(images.to_vec());
    }
    if let Some(images) = current_images
        && !images.is_empty()
    {
        return Ok(images.to_vec());
    }
    Err(AppError::validation("at least one image is required"))
}

/// GET /api/products - 商品目录 (筛选 + 排序)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let filter = CatalogFilter::from_query(&query);
    let products = product::find_with_filters(&state.pool, &filter).await?;
    Ok(Json(products))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let found = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    Ok(Json(found))
}

/// POST /api/products - 创建商品 (Admin)
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_create(&payload)?;
    let images = resolve_images(Some(&payload.images), None)?;

    let created = product::create(&state.pool, payload, images).await?;
    tracing::info!(
        product_id = created.id,
        operator = %current_user.email,
        "Product created"
    );
    Ok(Json(created))
}

/// PUT /api/products/:id - 更新商品 (Admin)
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    validate_update(&payload)?;

    let existing = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;

    // Only replace images when the payload actually carries some; falling
    // back to the stored list keeps the at-least-one-image invariant.
    let images = match &payload.images {
        Some(_) => Some(resolve_images(
            payload.images.as_deref(),
            Some(&existing.images),
        )?),
        None => None,
    };

    let updated = product::update(&state.pool, id, payload, images).await?;
    tracing::info!(
        product_id = id,
        operator = %current_user.email,
        "Product updated"
    );
    Ok(Json(updated))
}

/// DELETE /api/products/:id - 删除商品 (Admin)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = product::delete(&state.pool, id).await?;
    tracing::info!(
        product_id = id,
        operator = %current_user.email,
        "Product deleted"
    );
    Ok(Json(result))
}

/// POST /api/products/:id/reviews - 添加商品评价
pub async fn add_review(
    State(state): State<ServerState>,
    Extension(_current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<Json<Review>> {
    validate_required_text(&payload.author, "author", MAX_NAME_LEN)?;
    validate_required_text(&payload.comment, "comment", MAX_NOTE_LEN)?;
    validate_rating(payload.rating)?;

    let created = review::add(&state.pool, id, payload).await?;
    Ok(Json(created))
}

/// GET /api/products/:id/reviews - 商品评价列表 (最新优先)
pub async fn list_reviews(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Review>>> {
    if product::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::not_found(format!("Product {id} not found")));
    }
    let reviews = review::find_by_product(&state.pool, id).await?;
    Ok(Json(reviews))
}
