use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON body extractor whose rejection is an [`ApiError`], so malformed
/// bodies, wrong field types, and unknown fields all come back as the
/// API's structured 400 instead of axum's default plain-text rejection.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);
