use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;
use futures::TryStreamExt;

use crate::api::AppJson;
use crate::auth::Subject;
use crate::error::ApiError;
use crate::models::review::{Review, ReviewCreate, ReviewUpdate};
use crate::models::timestamp_value;
use crate::policy::{self, Action};
use crate::state::AppState;

use super::fetch_document;

const COLLECTION: &str = "reviews";

/// GET /reviews - public listing.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Review>>, ApiError> {
    let mut docs = state.store.stream_all(COLLECTION).await?;
    let mut reviews = Vec::new();
    while let Some(doc) = docs.try_next().await? {
        reviews.push(Review::from_document(doc)?);
    }
    Ok(Json(reviews))
}

/// GET /reviews/:review_id
pub async fn get(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<Json<Review>, ApiError> {
    let doc = fetch_document(state.store.as_ref(), COLLECTION, &review_id, "Review").await?;
    Ok(Json(Review::from_document(doc)?))
}

/// POST /reviews - reviewers submit their own feedback.
pub async fn create(
    State(state): State<AppState>,
    subject: Subject,
    AppJson(payload): AppJson<ReviewCreate>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    payload.validate()?;
    policy::review_create(&subject, &payload.reviewer_id)?;

    let mut fields = payload.document_fields()?;
    fields.insert("reviewedAt".to_string(), timestamp_value(Utc::now()));

    let id = state.store.add(COLLECTION, fields).await?;

    let doc = fetch_document(state.store.as_ref(), COLLECTION, &id, "Review").await?;
    Ok((StatusCode::CREATED, Json(Review::from_document(doc)?)))
}

/// PUT /reviews/:review_id - partial update by the reviewer.
/// reviewedAt is set at creation only.
pub async fn update(
    State(state): State<AppState>,
    subject: Subject,
    Path(review_id): Path<String>,
    AppJson(patch): AppJson<ReviewUpdate>,
) -> Result<Json<Review>, ApiError> {
    let doc = fetch_document(state.store.as_ref(), COLLECTION, &review_id, "Review").await?;
    let existing = Review::from_document(doc)?;
    policy::review_mutate(&subject, &existing.reviewer_id, Action::Update)?;

    patch.validate()?;
    let writes = patch.writes()?;
    if writes.is_empty() {
        return Err(ApiError::bad_request("No fields provided for update"));
    }

    state.store.update(COLLECTION, &review_id, writes).await?;

    let doc = fetch_document(state.store.as_ref(), COLLECTION, &review_id, "Review").await?;
    Ok(Json(Review::from_document(doc)?))
}

/// DELETE /reviews/:review_id
pub async fn delete(
    State(state): State<AppState>,
    subject: Subject,
    Path(review_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let doc = fetch_document(state.store.as_ref(), COLLECTION, &review_id, "Review").await?;
    let existing = Review::from_document(doc)?;
    policy::review_mutate(&subject, &existing.reviewer_id, Action::Delete)?;

    state.store.delete(COLLECTION, &review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
