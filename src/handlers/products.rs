use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;
use futures::TryStreamExt;
use serde_json::Value;

use crate::api::AppJson;
use crate::auth::Subject;
use crate::error::ApiError;
use crate::models::product::{Product, ProductCreate, ProductUpdate};
use crate::models::timestamp_value;
use crate::policy::{self, Action};
use crate::state::AppState;
use crate::store::FieldWrite;

use super::fetch_document;

const COLLECTION: &str = "products";

/// GET /products - public catalog listing.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let mut docs = state.store.stream_all(COLLECTION).await?;
    let mut products = Vec::new();
    while let Some(doc) = docs.try_next().await? {
        products.push(Product::from_document(doc)?);
    }
    Ok(Json(products))
}

/// GET /products/:product_id
pub async fn get(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let doc = fetch_document(state.store.as_ref(), COLLECTION, &product_id, "Product").await?;
    Ok(Json(Product::from_document(doc)?))
}

/// POST /products - sellers list their own hardware.
pub async fn create(
    State(state): State<AppState>,
    subject: Subject,
    AppJson(payload): AppJson<ProductCreate>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    payload.validate()?;
    policy::product_create(&subject, &payload.seller_id)?;

    let now = Utc::now();
    let mut fields = payload.document_fields()?;
    fields.insert("postedAt".to_string(), timestamp_value(now));
    fields.insert("updatedAt".to_string(), timestamp_value(now));
    fields.insert("views".to_string(), Value::from(0u64));

    let id = state.store.add(COLLECTION, fields).await?;

    // Read the stored document back so the response reflects exactly what
    // the store holds.
    let doc = fetch_document(state.store.as_ref(), COLLECTION, &id, "Product").await?;
    Ok((StatusCode::CREATED, Json(Product::from_document(doc)?)))
}

/// PUT /products/:product_id - partial update by the seller.
pub async fn update(
    State(state): State<AppState>,
    subject: Subject,
    Path(product_id): Path<String>,
    AppJson(patch): AppJson<ProductUpdate>,
) -> Result<Json<Product>, ApiError> {
    let doc = fetch_document(state.store.as_ref(), COLLECTION, &product_id, "Product").await?;
    let existing = Product::from_document(doc)?;
    policy::product_mutate(&subject, &existing.seller_id, Action::Update)?;

    patch.validate()?;
    let mut writes = patch.writes()?;
    if writes.is_empty() {
        return Err(ApiError::bad_request("No fields provided for update"));
    }
    writes.push(("updatedAt".to_string(), FieldWrite::Set(timestamp_value(Utc::now()))));

    state.store.update(COLLECTION, &product_id, writes).await?;

    let doc = fetch_document(state.store.as_ref(), COLLECTION, &product_id, "Product").await?;
    Ok(Json(Product::from_document(doc)?))
}

/// DELETE /products/:product_id
pub async fn delete(
    State(state): State<AppState>,
    subject: Subject,
    Path(product_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let doc = fetch_document(state.store.as_ref(), COLLECTION, &product_id, "Product").await?;
    let existing = Product::from_document(doc)?;
    policy::product_mutate(&subject, &existing.seller_id, Action::Delete)?;

    state.store.delete(COLLECTION, &product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
