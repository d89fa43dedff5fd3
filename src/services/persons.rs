use garde::Validate;

use crate::error::{AppError, Result};
use crate::models::{ensure_id, person::{normalize_email, Person, PersonInput}};
use crate::repositories::person as person_repo;
use crate::services::auth::hash_password;
use crate::state::AppState;

/// Creates or updates a person.
///
/// A missing password keeps whatever hash the person already has. An email
/// may belong to one person only.
///
/// # Arguments
///
/// * `input` - The person's fields and an optional new password.
///
/// # Returns
///
/// The stored person, with a fresh id when `input` carried none.
pub async fn save_person(state: &AppState, mut input: PersonInput) -> Result<Person> {
    input.fields.email = normalize_email(&input.fields.email);
    input.validate()?;

    let store = state.store.as_ref();
    let PersonInput { mut fields, password } = input;
    ensure_id(&mut fields.id, state.clock.now());

    if let Some(owner) = person_repo::find_by_email(store, &fields.email).await? {
        if owner.id() != fields.id {
            return Err(AppError::Validation("Email is already registered".to_string()));
        }
    }

    let password_hash = match password {
        Some(password) => Some(hash_password(&password).await?),
        None => person_repo::find_by_id(store, &fields.id)
            .await?
            .and_then(|existing| existing.password_hash),
    };

    let mut person = Person { fields, password_hash };
    person_repo::save_person(store, &mut person).await?;

    tracing::info!("✅ Person saved: {}", person.id());
    Ok(person)
}

pub async fn get_person(state: &AppState, id: &str) -> Result<Person> {
    person_repo::find_by_id(state.store.as_ref(), id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Every person, optionally narrowed by a case-insensitive match on name or email.
pub async fn search_persons(state: &AppState, query: Option<&str>) -> Result<Vec<Person>> {
    let persons = person_repo::list_all(state.store.as_ref()).await?;

    let Some(needle) = query.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty()) else {
        return Ok(persons);
    };

    Ok(persons
        .into_iter()
        .filter(|p| {
            p.fields.first_name.to_lowercase().contains(&needle)
                || p.fields.last_name.to_lowercase().contains(&needle)
                || p.fields.email.contains(&needle)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::person::PersonFields;
    use crate::testing::TestHarness;

    fn input(email: &str, password: Option<&str>) -> PersonInput {
        PersonInput {
            fields: PersonFields {
                first_name: "John".into(),
                last_name: "Doe".into(),
                email: email.into(),
                ..Default::default()
            },
            password: password.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn assigns_id_and_normalizes_email() {
        let harness = TestHarness::new();
        let saved = save_person(&harness.state, input("John.Doe@Example.com", Some("password123")))
            .await
            .unwrap();

        assert_eq!(saved.id().len(), 26);
        assert_eq!(saved.email(), "john.doe@example.com");
        assert!(saved.has_password());
    }

    #[tokio::test]
    async fn padded_email_is_trimmed_before_validation() {
        let harness = TestHarness::new();
        let saved = save_person(&harness.state, input("  Padded@Example.com ", None))
            .await
            .unwrap();

        assert_eq!(saved.email(), "padded@example.com");
    }

    #[tokio::test]
    async fn update_without_password_keeps_hash() {
        let harness = TestHarness::new();
        let first = save_person(&harness.state, input("a@example.com", Some("password123"))).await.unwrap();

        let mut update = input("a@example.com", None);
        update.fields.id = first.id().to_string();
        update.fields.city = "Hanover".into();
        let second = save_person(&harness.state, update).await.unwrap();

        assert_eq!(second.id(), first.id());
        assert_eq!(second.password_hash, first.password_hash);
        assert_eq!(second.fields.city, "Hanover");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let harness = TestHarness::new();
        save_person(&harness.state, input("dup@example.com", None)).await.unwrap();
        let err = save_person(&harness.state, input("DUP@example.com", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn search_filters_by_name_or_email() {
        let harness = TestHarness::new();
        save_person(&harness.state, input("john@example.com", None)).await.unwrap();
        let mut jane = input("jane@example.org", None);
        jane.fields.first_name = "Jane".into();
        jane.fields.last_name = "Roe".into();
        save_person(&harness.state, jane).await.unwrap();

        assert_eq!(search_persons(&harness.state, None).await.unwrap().len(), 2);
        assert_eq!(search_persons(&harness.state, Some("ROE")).await.unwrap().len(), 1);
        assert_eq!(search_persons(&harness.state, Some("example.org")).await.unwrap().len(), 1);
        assert!(search_persons(&harness.state, Some("nobody")).await.unwrap().is_empty());
    }
}
