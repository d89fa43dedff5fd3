//! Collection/id keyed JSON document storage.

pub mod memory;
pub mod postgres;

use serde_json::Value;

use crate::error::Result;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// A stored document body.
pub type Document = Value;

/// Collection names.
pub mod collections {
    pub const PERSONS: &str = "persons";
    pub const HOUSEHOLDS: &str = "households";
    pub const FOOD_BANKS: &str = "foodbanks";
    pub const ITEMS: &str = "items";
    pub const VISITS: &str = "visits";
    pub const RESET_PASSWORDS: &str = "reset_passwords";
}

/// Ordering of a collection listing by document id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// Storage backend for all entities.
///
/// Each call is atomic for the single document it touches; nothing spans
/// documents.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches a document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Inserts or replaces a document.
    async fn put(&self, collection: &str, id: &str, body: Document) -> Result<()>;

    /// Deletes a document if present. Returns `true` only for the caller that removed it.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool>;

    /// Documents whose top-level string `field` equals `value`, ordered by id.
    async fn find_by_field(&self, collection: &str, field: &str, value: &str) -> Result<Vec<Document>>;

    /// Every document in a collection.
    async fn list(&self, collection: &str, order: Order) -> Result<Vec<Document>>;
}
