use crate::{
    error::Result,
    models::visit::Visit,
    store::{collections::VISITS, DocumentStore},
};

pub async fn save_visit(store: &dyn DocumentStore, visit: &Visit) -> Result<()> {
    super::save(store, VISITS, &visit.id, visit).await
}

/// Visits of one household, oldest first.
pub async fn list_for_household(store: &dyn DocumentStore, household_id: &str) -> Result<Vec<Visit>> {
    super::fetch_where(store, VISITS, "householdId", household_id).await
}
