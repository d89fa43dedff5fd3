use crate::{
    error::Result,
    models::food_bank::FoodBank,
    store::{collections::FOOD_BANKS, DocumentStore, Order},
};

pub async fn save_food_bank(store: &dyn DocumentStore, food_bank: &FoodBank) -> Result<()> {
    super::save(store, FOOD_BANKS, &food_bank.id, food_bank).await
}

pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> Result<Option<FoodBank>> {
    super::fetch(store, FOOD_BANKS, id).await
}

pub async fn list_all(store: &dyn DocumentStore) -> Result<Vec<FoodBank>> {
    super::fetch_all(store, FOOD_BANKS, Order::Ascending).await
}
