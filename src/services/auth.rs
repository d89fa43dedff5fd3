use tokio::sync::OnceCell;
use zeroize::Zeroizing;

use crate::crypto::password;
use crate::error::{AppError, Result};
use crate::models::person::Person;
use crate::repositories::person as person_repo;
use crate::state::AppState;

/// The one message every failed login gets.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Hashes on the blocking pool; Argon2 takes on the order of 100ms.
pub async fn hash_password(password: &str) -> Result<String> {
    let password = Zeroizing::new(password.to_string());
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
}

async fn verify_password(password: &str, hash: String) -> Result<bool> {
    let password = Zeroizing::new(password.to_string());
    tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
}

/// A hash verified against when no account matches, so every failed login
/// pays for one Argon2 run.
static DUMMY_HASH: OnceCell<String> = OnceCell::const_new();

async fn dummy_hash() -> Result<String> {
    DUMMY_HASH
        .get_or_try_init(|| hash_password("cupboard-no-such-account"))
        .await
        .cloned()
}

fn invalid_credentials() -> AppError {
    AppError::Authentication(INVALID_CREDENTIALS.to_string())
}

/// Checks an email/password pair and issues a session token.
///
/// Unknown emails, accounts without a password and wrong passwords all fail
/// with the same error.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<String> {
    tracing::debug!("🔐 Login attempt");

    let person = person_repo::find_by_email(state.store.as_ref(), email)
        .await?
        .filter(Person::has_password);

    let Some(person) = person else {
        verify_password(password, dummy_hash().await?).await?;
        return Err(invalid_credentials());
    };

    let hash = person.password_hash.clone().unwrap_or_default();
    if !verify_password(password, hash).await? {
        return Err(invalid_credentials());
    }

    let token = state.sessions.issue(person.id(), state.clock.now())?;
    tracing::info!("✅ Person authenticated: {}", person.id());
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHarness;

    #[tokio::test]
    async fn login_returns_token_for_person() {
        let harness = TestHarness::new();
        let id = harness.add_person("Test@Example.com", Some("password123")).await;

        let token = login(&harness.state, "test@example.com", "password123").await.unwrap();
        let claims = harness.state.sessions.open(&token).unwrap();
        assert_eq!(claims.subject_id, id);
    }

    #[tokio::test]
    async fn email_lookup_ignores_case() {
        let harness = TestHarness::new();
        harness.add_person("mixed@example.com", Some("password123")).await;
        assert!(login(&harness.state, "  MIXED@Example.COM", "password123").await.is_ok());
    }

    #[tokio::test]
    async fn failures_are_indistinguishable() {
        let harness = TestHarness::new();
        harness.add_person("known@example.com", Some("password123")).await;
        harness.add_person("nopass@example.com", None).await;

        let wrong_password = login(&harness.state, "known@example.com", "password124").await.unwrap_err();
        let unknown = login(&harness.state, "ghost@example.com", "password123").await.unwrap_err();
        let no_hash = login(&harness.state, "nopass@example.com", "").await.unwrap_err();

        for err in [wrong_password, unknown, no_hash] {
            match err {
                AppError::Authentication(msg) => assert_eq!(msg, INVALID_CREDENTIALS),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn unknown_account_checks_the_dummy_hash() {
        let harness = TestHarness::new();

        let hash = dummy_hash().await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert_eq!(dummy_hash().await.unwrap(), hash);

        let err = login(&harness.state, "ghost@example.com", "cupboard-no-such-account")
            .await
            .unwrap_err();
        match err {
            AppError::Authentication(msg) => assert_eq!(msg, INVALID_CREDENTIALS),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
