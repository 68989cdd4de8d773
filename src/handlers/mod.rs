pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

use crate::error::ApiError;
use crate::store::{Document, DocumentStore};

/// Fetch a document or fail with the kind-specific 404.
pub(crate) async fn fetch_document(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    kind: &str,
) -> Result<Document, ApiError> {
    store
        .get(collection, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{} not found", kind)))
}
