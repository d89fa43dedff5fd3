use crate::{
    error::Result,
    models::reset_ticket::ResetTicket,
    store::{collections::RESET_PASSWORDS, DocumentStore},
};

pub async fn create(store: &dyn DocumentStore, ticket: &ResetTicket) -> Result<()> {
    super::save(store, RESET_PASSWORDS, &ticket.id, ticket).await
}

pub async fn find(store: &dyn DocumentStore, id: &str) -> Result<Option<ResetTicket>> {
    super::fetch(store, RESET_PASSWORDS, id).await
}

/// Removes a ticket. Only the caller that gets `true` has consumed it.
///
/// # Arguments
///
/// * `store` - The document store holding the `reset_passwords` collection.
/// * `id` - The ticket id.
///
/// # Returns
///
/// `true` if this call deleted the ticket, `false` if it was already gone.
pub async fn claim(store: &dyn DocumentStore, id: &str) -> Result<bool> {
    store.delete(RESET_PASSWORDS, id).await
}
