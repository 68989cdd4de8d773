use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

pub mod memory;

/// Raw document fields, keyed by wire-format (camelCase) field name.
pub type Fields = serde_json::Map<String, Value>;

/// A document snapshot: the storage key plus the stored fields.
/// The key is never duplicated inside `fields`; resource models inject it
/// under their id field when building a response.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// One tagged write in a merge update. `Delete` removes the key from the
/// stored document entirely, as opposed to storing a null.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldWrite {
    Set(Value),
    Delete,
}

/// Ordered set of field writes applied as a single merge.
pub type WriteBatch = Vec<(String, FieldWrite)>;

pub type DocumentStream = BoxStream<'static, Result<Document, StoreError>>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document store not initialized")]
    Unavailable,
    #[error("{0}")]
    Backend(String),
}

/// Key-addressed, schema-less document storage with per-field merge updates.
/// Mirrors the subset of a managed document store the API needs; the
/// in-process [`memory::MemoryStore`] backs the binary and the test suite.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document, or None if absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Insert a new document under a store-generated id; returns the id.
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Create (or overwrite) a document at a known key.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Merge field writes into an existing document. Updating a missing
    /// document is a backend error; callers check existence first.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        writes: WriteBatch,
    ) -> Result<(), StoreError>;

    /// Remove a document. Removing a missing document succeeds.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Stream every document whose `field` equals `value`.
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: Value,
    ) -> Result<DocumentStream, StoreError>;

    /// Stream every document in a collection.
    async fn stream_all(&self, collection: &str) -> Result<DocumentStream, StoreError>;

    /// Connectivity check, reported by the welcome and health endpoints.
    async fn ping(&self) -> Result<(), StoreError>;
}
