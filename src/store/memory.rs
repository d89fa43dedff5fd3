use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{Document, DocumentStore, Order};
use crate::error::Result;

type Collection = BTreeMap<String, Document>;

/// A process-local document store for development and tests.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, |c| c.len())
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|c| c.get(id)).cloned())
    }

    async fn put(&self, collection: &str, id: &str, body: Document) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), body);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .is_some_and(|c| c.remove(id).is_some()))
    }

    async fn find_by_field(&self, collection: &str, field: &str, value: &str) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .values()
            .filter(|doc| doc.get(field).and_then(|v| v.as_str()) == Some(value))
            .cloned()
            .collect())
    }

    async fn list(&self, collection: &str, order: Order) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut out: Vec<Document> = docs.values().cloned().collect();
        if order == Order::Descending {
            out.reverse();
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_get_overwrite() {
        let store = MemoryDocumentStore::new();
        store.put("c", "1", json!({"v": 1})).await.unwrap();
        store.put("c", "1", json!({"v": 2})).await.unwrap();
        assert_eq!(store.get("c", "1").await.unwrap(), Some(json!({"v": 2})));
        assert_eq!(store.get("c", "2").await.unwrap(), None);
        assert_eq!(store.get("other", "1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_claims_exactly_once() {
        let store = MemoryDocumentStore::new();
        store.put("c", "1", json!({})).await.unwrap();
        assert!(store.delete("c", "1").await.unwrap());
        assert!(!store.delete("c", "1").await.unwrap());
        assert!(!store.delete("missing", "1").await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_deletes_have_one_winner() {
        let store = MemoryDocumentStore::new();
        store.put("c", "t", json!({})).await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.delete("c", "t").await.unwrap() })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn find_and_list() {
        let store = MemoryDocumentStore::new();
        store.put("p", "01A", json!({"email": "a@x.org"})).await.unwrap();
        store.put("p", "01B", json!({"email": "b@x.org"})).await.unwrap();
        store.put("p", "01C", json!({"email": "a@x.org"})).await.unwrap();

        let found = store.find_by_field("p", "email", "a@x.org").await.unwrap();
        assert_eq!(found.len(), 2);

        let desc = store.list("p", Order::Descending).await.unwrap();
        assert_eq!(desc[0]["email"], "a@x.org");
        assert_eq!(desc[1]["email"], "b@x.org");
        assert_eq!(store.count("p").await, 3);
    }
}
