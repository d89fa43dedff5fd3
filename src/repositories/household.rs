use crate::{
    error::Result,
    models::household::Household,
    store::{collections::HOUSEHOLDS, DocumentStore, Order},
};

pub async fn save_household(store: &dyn DocumentStore, household: &Household) -> Result<()> {
    super::save(store, HOUSEHOLDS, &household.id, household).await
}

pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> Result<Option<Household>> {
    super::fetch(store, HOUSEHOLDS, id).await
}

/// Households, most recently registered first.
pub async fn list_newest_first(store: &dyn DocumentStore) -> Result<Vec<Household>> {
    super::fetch_all(store, HOUSEHOLDS, Order::Descending).await
}

pub async fn delete(store: &dyn DocumentStore, id: &str) -> Result<bool> {
    store.delete(HOUSEHOLDS, id).await
}
