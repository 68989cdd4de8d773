use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;
use futures::TryStreamExt;

use crate::api::AppJson;
use crate::auth::Subject;
use crate::error::ApiError;
use crate::models::timestamp_value;
use crate::models::user::{User, UserCreate, UserUpdate};
use crate::policy::{self, Action};
use crate::state::AppState;

use super::fetch_document;

const COLLECTION: &str = "users";

/// GET /users - any authenticated caller; no per-row filter.
pub async fn list(
    State(state): State<AppState>,
    _subject: Subject,
) -> Result<Json<Vec<User>>, ApiError> {
    let mut docs = state.store.stream_all(COLLECTION).await?;
    let mut users = Vec::new();
    while let Some(doc) = docs.try_next().await? {
        users.push(User::from_document(doc)?);
    }
    Ok(Json(users))
}

/// GET /users/:user_id - own profile only.
pub async fn get(
    State(state): State<AppState>,
    subject: Subject,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    policy::user_access(&subject, &user_id, Action::View)?;
    let doc = fetch_document(state.store.as_ref(), COLLECTION, &user_id, "User").await?;
    Ok(Json(User::from_document(doc)?))
}

/// POST /users - create the caller's profile. The document key is the
/// subject uid; a second create for the same uid conflicts.
pub async fn create(
    State(state): State<AppState>,
    subject: Subject,
    AppJson(payload): AppJson<UserCreate>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    payload.validate()?;

    let user_id = subject.uid;
    if state.store.get(COLLECTION, &user_id).await?.is_some() {
        return Err(ApiError::conflict(format!(
            "User profile for UID {} already exists.",
            user_id
        )));
    }

    let now = Utc::now();
    let mut fields = payload.document_fields()?;
    fields.insert("createdAt".to_string(), timestamp_value(now));
    fields.insert("lastLoginAt".to_string(), timestamp_value(now));

    state.store.set(COLLECTION, &user_id, fields).await?;

    let doc = fetch_document(state.store.as_ref(), COLLECTION, &user_id, "User").await?;
    Ok((StatusCode::CREATED, Json(User::from_document(doc)?)))
}

/// PUT /users/:user_id - partial update of the caller's own profile.
/// createdAt and lastLoginAt are login-time concerns and are not touched.
pub async fn update(
    State(state): State<AppState>,
    subject: Subject,
    Path(user_id): Path<String>,
    AppJson(patch): AppJson<UserUpdate>,
) -> Result<Json<User>, ApiError> {
    policy::user_access(&subject, &user_id, Action::Update)?;
    fetch_document(state.store.as_ref(), COLLECTION, &user_id, "User").await?;

    patch.validate()?;
    let writes = patch.writes()?;
    if writes.is_empty() {
        return Err(ApiError::bad_request("No fields provided for update"));
    }

    state.store.update(COLLECTION, &user_id, writes).await?;

    let doc = fetch_document(state.store.as_ref(), COLLECTION, &user_id, "User").await?;
    Ok(Json(User::from_document(doc)?))
}

/// DELETE /users/:user_id - the caller's own profile only.
pub async fn delete(
    State(state): State<AppState>,
    subject: Subject,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    policy::user_access(&subject, &user_id, Action::Delete)?;
    fetch_document(state.store.as_ref(), COLLECTION, &user_id, "User").await?;

    state.store.delete(COLLECTION, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
