use crate::{
    error::Result,
    models::item::Item,
    store::{collections::ITEMS, DocumentStore},
};

pub async fn save_item(store: &dyn DocumentStore, item: &Item) -> Result<()> {
    super::save(store, ITEMS, &item.id, item).await
}

pub async fn list_for_food_bank(store: &dyn DocumentStore, food_bank_id: &str) -> Result<Vec<Item>> {
    super::fetch_where(store, ITEMS, "foodBankId", food_bank_id).await
}
