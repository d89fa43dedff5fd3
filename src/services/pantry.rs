//! Households, food banks, their items and visits.

use garde::Validate;

use crate::error::{AppError, Result};
use crate::models::{
    ensure_id, food_bank::FoodBank, household::Household, item::Item, new_id, visit::Visit,
};
use crate::repositories::{
    food_bank as food_bank_repo, household as household_repo, item as item_repo,
    visit as visit_repo,
};
use crate::state::AppState;

/// Registers a new household. The id is always freshly minted so its
/// timestamp records the signup.
pub async fn register_household(state: &AppState, mut household: Household) -> Result<Household> {
    household.validate()?;
    household.id = new_id(state.clock.now());

    household_repo::save_household(state.store.as_ref(), &household).await?;
    tracing::info!("🏠 Household registered: {}", household.id);
    Ok(household)
}

pub async fn get_household(state: &AppState, id: &str) -> Result<Household> {
    household_repo::find_by_id(state.store.as_ref(), id)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn delete_household(state: &AppState, id: &str) -> Result<()> {
    if !household_repo::delete(state.store.as_ref(), id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!("🗑️  Household deleted: {}", id);
    Ok(())
}

pub async fn save_food_bank(state: &AppState, mut food_bank: FoodBank) -> Result<FoodBank> {
    food_bank.validate()?;
    ensure_id(&mut food_bank.id, state.clock.now());

    food_bank_repo::save_food_bank(state.store.as_ref(), &food_bank).await?;
    tracing::info!("✅ Food bank saved: {}", food_bank.id);
    Ok(food_bank)
}

async fn require_food_bank(state: &AppState, id: &str) -> Result<()> {
    food_bank_repo::find_by_id(state.store.as_ref(), id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::Validation(format!("Unknown food bank: {}", id)))
}

/// Saves an item belonging to an existing food bank.
pub async fn save_item(state: &AppState, mut item: Item) -> Result<Item> {
    item.validate()?;
    require_food_bank(state, &item.food_bank_id).await?;
    ensure_id(&mut item.id, state.clock.now());

    item_repo::save_item(state.store.as_ref(), &item).await?;
    tracing::info!("✅ Item saved: {}", item.id);
    Ok(item)
}

pub async fn items_of_food_bank(state: &AppState, food_bank_id: &str) -> Result<Vec<Item>> {
    require_food_bank(state, food_bank_id).await?;
    item_repo::list_for_food_bank(state.store.as_ref(), food_bank_id).await
}

/// Records a visit of an existing household to an existing food bank.
///
/// # Arguments
///
/// * `visit` - The visit; its id is minted when missing.
///
/// # Returns
///
/// The stored visit, or a validation error naming the unknown household or
/// food bank.
pub async fn record_visit(state: &AppState, mut visit: Visit) -> Result<Visit> {
    visit.validate()?;
    require_food_bank(state, &visit.food_bank_id).await?;
    if household_repo::find_by_id(state.store.as_ref(), &visit.household_id).await?.is_none() {
        return Err(AppError::Validation(format!("Unknown household: {}", visit.household_id)));
    }
    ensure_id(&mut visit.id, state.clock.now());

    visit_repo::save_visit(state.store.as_ref(), &visit).await?;
    tracing::info!("✅ Visit recorded: {}", visit.id);
    Ok(visit)
}

pub async fn visits_of_household(state: &AppState, household_id: &str) -> Result<Vec<Visit>> {
    get_household(state, household_id).await?;
    visit_repo::list_for_household(state.store.as_ref(), household_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::food_bank::Address;
    use crate::models::household::HouseholdMember;
    use crate::testing::TestHarness;

    fn food_bank() -> FoodBank {
        FoodBank {
            name: "Upper Valley Pantry".into(),
            address: Address {
                street1: "1 Main St".into(),
                city: "Lebanon".into(),
                state: "NH".into(),
                zip: "03766".into(),
                country: "US".into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn household() -> Household {
        Household {
            id: "client-chosen".into(),
            head: HouseholdMember {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                dob: "1990-12-10".into(),
                ..Default::default()
            },
            members: vec![],
        }
    }

    #[tokio::test]
    async fn food_bank_requires_address() {
        let harness = TestHarness::new();
        let mut incomplete = food_bank();
        incomplete.address.zip.clear();
        assert!(matches!(
            save_food_bank(&harness.state, incomplete).await,
            Err(AppError::Validation(_))
        ));

        let saved = save_food_bank(&harness.state, food_bank()).await.unwrap();
        assert_eq!(saved.id.len(), 26);
    }

    #[tokio::test]
    async fn items_need_an_existing_food_bank() {
        let harness = TestHarness::new();
        let orphan = Item { food_bank_id: "nope".into(), name: "Rice".into(), points: 2, ..Default::default() };
        assert!(save_item(&harness.state, orphan).await.is_err());

        let bank = save_food_bank(&harness.state, food_bank()).await.unwrap();
        let rice = Item { food_bank_id: bank.id.clone(), name: "Rice".into(), points: 2, ..Default::default() };
        save_item(&harness.state, rice).await.unwrap();

        let items = items_of_food_bank(&harness.state, &bank.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Rice");
    }

    #[tokio::test]
    async fn household_ids_are_minted_server_side() {
        let harness = TestHarness::new();
        let saved = register_household(&harness.state, household()).await.unwrap();
        assert_ne!(saved.id, "client-chosen");
        assert!(saved.created().is_some());
        assert_eq!(get_household(&harness.state, &saved.id).await.unwrap(), saved);

        delete_household(&harness.state, &saved.id).await.unwrap();
        assert!(matches!(get_household(&harness.state, &saved.id).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn visits_link_household_and_food_bank() {
        let harness = TestHarness::new();
        let bank = save_food_bank(&harness.state, food_bank()).await.unwrap();
        let home = register_household(&harness.state, household()).await.unwrap();

        let visit = Visit {
            date: "2024-05-01".into(),
            household_id: home.id.clone(),
            food_bank_id: bank.id.clone(),
            ..Default::default()
        };
        record_visit(&harness.state, visit.clone()).await.unwrap();

        let mut stray = visit;
        stray.household_id = "missing".into();
        assert!(record_visit(&harness.state, stray).await.is_err());

        assert_eq!(visits_of_household(&harness.state, &home.id).await.unwrap().len(), 1);
    }
}
