use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;
use futures::TryStreamExt;
use serde_json::Value;

use crate::api::AppJson;
use crate::auth::Subject;
use crate::error::ApiError;
use crate::models::order::{Order, OrderCreate, OrderUpdate};
use crate::models::timestamp_value;
use crate::policy::{self, Action};
use crate::state::AppState;

use super::fetch_document;

const COLLECTION: &str = "orders";

/// GET /orders - the caller's orders from both sides of the table: the
/// union of rows where they are the buyer and rows where they are the
/// seller, deduplicated by id.
pub async fn list(
    State(state): State<AppState>,
    subject: Subject,
) -> Result<Json<Vec<Order>>, ApiError> {
    let mut by_id: BTreeMap<String, Order> = BTreeMap::new();

    for field in ["buyerId", "sellerId"] {
        let mut docs = state
            .store
            .query_eq(COLLECTION, field, Value::String(subject.uid.clone()))
            .await?;
        while let Some(doc) = docs.try_next().await? {
            if !by_id.contains_key(&doc.id) {
                by_id.insert(doc.id.clone(), Order::from_document(doc)?);
            }
        }
    }

    Ok(Json(by_id.into_values().collect()))
}

/// GET /orders/:order_id - visible to the buyer or the seller.
pub async fn get(
    State(state): State<AppState>,
    subject: Subject,
    Path(order_id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let doc = fetch_document(state.store.as_ref(), COLLECTION, &order_id, "Order").await?;
    let order = Order::from_document(doc)?;
    policy::order_access(&subject, &order.buyer_id, &order.seller_id, Action::View)?;
    Ok(Json(order))
}

/// POST /orders - buyers place their own orders.
pub async fn create(
    State(state): State<AppState>,
    subject: Subject,
    AppJson(payload): AppJson<OrderCreate>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    payload.validate()?;
    policy::order_create(&subject, &payload.buyer_id)?;

    let mut fields = payload.document_fields()?;
    fields.insert("orderedAt".to_string(), timestamp_value(Utc::now()));
    // shippedAt and deliveredAt are set later through updates.

    let id = state.store.add(COLLECTION, fields).await?;

    let doc = fetch_document(state.store.as_ref(), COLLECTION, &id, "Order").await?;
    Ok((StatusCode::CREATED, Json(Order::from_document(doc)?)))
}

/// PUT /orders/:order_id - partial update by either party.
pub async fn update(
    State(state): State<AppState>,
    subject: Subject,
    Path(order_id): Path<String>,
    AppJson(patch): AppJson<OrderUpdate>,
) -> Result<Json<Order>, ApiError> {
    let doc = fetch_document(state.store.as_ref(), COLLECTION, &order_id, "Order").await?;
    let existing = Order::from_document(doc)?;
    policy::order_access(&subject, &existing.buyer_id, &existing.seller_id, Action::Update)?;

    patch.validate()?;
    let writes = patch.writes()?;
    if writes.is_empty() {
        return Err(ApiError::bad_request("No fields provided for update"));
    }

    state.store.update(COLLECTION, &order_id, writes).await?;

    let doc = fetch_document(state.store.as_ref(), COLLECTION, &order_id, "Order").await?;
    Ok(Json(Order::from_document(doc)?))
}

/// DELETE /orders/:order_id - either party may remove the order.
pub async fn delete(
    State(state): State<AppState>,
    subject: Subject,
    Path(order_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let doc = fetch_document(state.store.as_ref(), COLLECTION, &order_id, "Order").await?;
    let existing = Order::from_document(doc)?;
    policy::order_access(&subject, &existing.buyer_id, &existing.seller_id, Action::Delete)?;

    state.store.delete(COLLECTION, &order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
