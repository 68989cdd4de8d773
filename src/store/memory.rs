use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use uuid::Uuid;

use super::{Document, DocumentStore, DocumentStream, FieldWrite, Fields, StoreError, WriteBatch};

type Collections = HashMap<String, BTreeMap<String, Fields>>;

/// In-process document store. Collections are created lazily on first
/// write; iteration order within a collection is stable by id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, Collections>, StoreError> {
        self.collections.read().map_err(|_| StoreError::Backend("store lock poisoned".into()))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, Collections>, StoreError> {
        self.collections.write().map_err(|_| StoreError::Backend("store lock poisoned".into()))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.read_guard()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document { id: id.to_string(), fields: fields.clone() }))
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let mut collections = self.write_guard()?;
        collections.entry(collection.to_string()).or_default().insert(id.clone(), fields);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut collections = self.write_guard()?;
        collections.entry(collection.to_string()).or_default().insert(id.to_string(), fields);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        writes: WriteBatch,
    ) -> Result<(), StoreError> {
        let mut collections = self.write_guard()?;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| {
                StoreError::Backend(format!("no document {} in {} to update", id, collection))
            })?;

        for (field, write) in writes {
            match write {
                FieldWrite::Set(value) => {
                    doc.insert(field, value);
                }
                FieldWrite::Delete => {
                    doc.remove(&field);
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.write_guard()?;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: Value,
    ) -> Result<DocumentStream, StoreError> {
        let collections = self.read_guard()?;
        let matches: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| fields.get(field) == Some(&value))
                    .map(|(id, fields)| Document { id: id.clone(), fields: fields.clone() })
                    .collect()
            })
            .unwrap_or_default();

        Ok(stream::iter(matches.into_iter().map(Ok)).boxed())
    }

    async fn stream_all(&self, collection: &str) -> Result<DocumentStream, StoreError> {
        let collections = self.read_guard()?;
        let docs: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document { id: id.clone(), fields: fields.clone() })
                    .collect()
            })
            .unwrap_or_default();

        Ok(stream::iter(docs.into_iter().map(Ok)).boxed())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read_guard().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use serde_json::json;

    fn fields(pairs: &[(&str, Value)]) -> Fields {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[tokio::test]
    async fn add_assigns_id_and_get_roundtrips() {
        let store = MemoryStore::new();
        let id = store
            .add("products", fields(&[("name", json!("GPU fan"))]))
            .await
            .unwrap();

        let doc = store.get("products", &id).await.unwrap().unwrap();
        assert_eq!(doc.id, id);
        assert_eq!(doc.fields["name"], json!("GPU fan"));

        assert!(store.get("products", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_merges_and_delete_write_removes_key() {
        let store = MemoryStore::new();
        let id = store
            .add("orders", fields(&[("status", json!("pending")), ("note", json!("x"))]))
            .await
            .unwrap();

        store
            .update(
                "orders",
                &id,
                vec![
                    ("status".to_string(), FieldWrite::Set(json!("shipped"))),
                    ("note".to_string(), FieldWrite::Delete),
                ],
            )
            .await
            .unwrap();

        let doc = store.get("orders", &id).await.unwrap().unwrap();
        assert_eq!(doc.fields["status"], json!("shipped"));
        assert!(!doc.fields.contains_key("note"));
    }

    #[tokio::test]
    async fn update_missing_document_fails() {
        let store = MemoryStore::new();
        let result = store.update("orders", "nope", vec![]).await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn query_eq_filters_by_field() {
        let store = MemoryStore::new();
        store.add("orders", fields(&[("buyerId", json!("u1"))])).await.unwrap();
        store.add("orders", fields(&[("buyerId", json!("u2"))])).await.unwrap();
        store.add("orders", fields(&[("buyerId", json!("u1"))])).await.unwrap();

        let docs: Vec<Document> = store
            .query_eq("orders", "buyerId", json!("u1"))
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);

        let all: Vec<Document> =
            store.stream_all("orders").await.unwrap().try_collect().await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let id = store.add("reviews", Fields::new()).await.unwrap();
        store.delete("reviews", &id).await.unwrap();
        store.delete("reviews", &id).await.unwrap();
        assert!(store.get("reviews", &id).await.unwrap().is_none());
    }
}
