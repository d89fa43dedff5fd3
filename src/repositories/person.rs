use crate::{
    error::Result,
    models::person::{normalize_email, Person},
    store::{collections::PERSONS, DocumentStore, Order},
};

/// Inserts or replaces a person. The email is stored normalized.
pub async fn save_person(store: &dyn DocumentStore, person: &mut Person) -> Result<()> {
    person.fields.email = normalize_email(&person.fields.email);
    super::save(store, PERSONS, &person.fields.id, &*person).await
}

/// Finds a person by their ID.
pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> Result<Option<Person>> {
    super::fetch(store, PERSONS, id).await
}

/// Finds a person by email, ignoring case.
///
/// Emails are normalized on write, so the lookup normalizes its input and
/// compares exactly. Should two records ever share an address the oldest wins.
///
/// # Arguments
///
/// * `store` - The document store.
/// * `email` - The address to look up, in any case.
///
/// # Returns
///
/// The matching person, or `None` when the address is unknown or blank.
pub async fn find_by_email(store: &dyn DocumentStore, email: &str) -> Result<Option<Person>> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Ok(None);
    }
    let mut matches: Vec<Person> = super::fetch_where(store, PERSONS, "email", &email).await?;
    if matches.len() > 1 {
        tracing::warn!("⚠️  {} person records share one email", matches.len());
    }
    Ok(if matches.is_empty() { None } else { Some(matches.remove(0)) })
}

/// Every person, newest first.
pub async fn list_all(store: &dyn DocumentStore) -> Result<Vec<Person>> {
    super::fetch_all(store, PERSONS, Order::Descending).await
}

/// Replaces a person's password hash.
pub async fn update_password_hash(
    store: &dyn DocumentStore,
    person: &mut Person,
    password_hash: String,
) -> Result<()> {
    person.password_hash = Some(password_hash);
    save_person(store, person).await
}
