//! Typed access to the document store, one module per collection.

pub mod food_bank;
pub mod household;
pub mod item;
pub mod person;
pub mod reset_ticket;
pub mod visit;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;
use crate::store::{DocumentStore, Order};

async fn fetch<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>> {
    Ok(store
        .get(collection, id)
        .await?
        .map(serde_json::from_value)
        .transpose()?)
}

async fn save<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    document: &T,
) -> Result<()> {
    store.put(collection, id, serde_json::to_value(document)?).await
}

async fn fetch_all<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    order: Order,
) -> Result<Vec<T>> {
    store
        .list(collection, order)
        .await?
        .into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(Into::into))
        .collect()
}

async fn fetch_where<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    field: &str,
    value: &str,
) -> Result<Vec<T>> {
    store
        .find_by_field(collection, field, value)
        .await?
        .into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(Into::into))
        .collect()
}
