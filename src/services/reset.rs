use crate::error::{Result, TicketError};
use crate::models::reset_ticket::{is_expired, parse_ticket_id, ResetTicket};
use crate::repositories::{person as person_repo, reset_ticket as ticket_repo};
use crate::services::auth::hash_password;
use crate::state::AppState;

pub const RESET_EMAIL_SUBJECT: &str = "Password Reset";

/// The link a person follows to choose a new password.
pub fn reset_link(base_url: &str, ticket_id: &str) -> String {
    format!("{}/reset-password?resetPasswordId={}", base_url, ticket_id)
}

/// Issues a reset ticket for the person registered under `email` and mails them the link.
///
/// Returns `Ok(())` without doing anything when no person has that email, so
/// callers cannot probe which addresses are registered. A failed send is
/// reported but the stored ticket stays.
pub async fn issue_ticket(state: &AppState, email: &str) -> Result<()> {
    let store = state.store.as_ref();

    let Some(person) = person_repo::find_by_email(store, email).await? else {
        tracing::info!("🔑 Reset requested for an unregistered address");
        return Ok(());
    };

    let ticket = ResetTicket::issue(person.id(), state.clock.now());
    ticket_repo::create(store, &ticket).await?;
    tracing::info!("🎫 Reset ticket issued for person: {}", person.id());

    let link = reset_link(&state.config.public_base_url, &ticket.id);
    let body = format!(
        "<p>Someone asked to reset the password for this address.</p>\
         <p><a href=\"{link}\">Click here to reset your password</a>. \
         The link works once and expires in 12 hours.</p>\
         <p>If this wasn't you, ignore this email.</p>"
    );

    state
        .mailer
        .send(person.email(), RESET_EMAIL_SUBJECT, &body)
        .await
}

/// Sets a new password using a reset ticket, consuming the ticket.
///
/// The ticket is claimed with a conditional delete before the password is
/// written, so of two concurrent redemptions at most one changes the password.
/// If the write then fails the ticket is put back and the link stays usable.
///
/// # Arguments
///
/// * `ticket_id` - The id carried by the emailed reset link.
/// * `new_password` - The plaintext password to hash and store.
///
/// # Returns
///
/// `Ok(())` once the new hash is stored, otherwise a [`TicketError`] for an
/// unusable ticket or the storage error that stopped the write.
pub async fn redeem_ticket(state: &AppState, ticket_id: &str, new_password: &str) -> Result<()> {
    let store = state.store.as_ref();

    let id = parse_ticket_id(ticket_id)?;
    if is_expired(&id, state.clock.now()) {
        return Err(TicketError::TicketExpired.into());
    }
    let id = id.to_string();

    let ticket = ticket_repo::find(store, &id)
        .await?
        .ok_or(TicketError::TicketNotFound)?;

    let mut person = person_repo::find_by_id(store, &ticket.person_id)
        .await?
        .ok_or(TicketError::AccountNotFound)?;

    let new_hash = hash_password(new_password).await?;

    if !ticket_repo::claim(store, &id).await? {
        tracing::warn!("⚠️  Reset ticket {} was consumed concurrently", id);
        return Err(TicketError::TicketNotFound.into());
    }

    if let Err(e) = person_repo::update_password_hash(store, &mut person, new_hash).await {
        tracing::error!("❌ Password update failed for ticket {}: {}", id, e);
        if let Err(restore) = ticket_repo::create(store, &ticket).await {
            tracing::error!("❌ Could not restore reset ticket {}: {}", id, restore);
        }
        return Err(e);
    }

    tracing::info!("✅ Password reset for person: {}", person.id());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::error::AppError;
    use crate::services::auth::login;
    use crate::store::collections::{PERSONS, RESET_PASSWORDS};
    use crate::store::{Document, DocumentStore, MemoryDocumentStore, Order};
    use crate::testing::TestHarness;
    use chrono::Duration;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// A memory store whose writes to `persons` fail while `failing` is set.
    struct FailingPersonWrites {
        inner: MemoryDocumentStore,
        failing: AtomicBool,
    }

    #[async_trait::async_trait]
    impl DocumentStore for FailingPersonWrites {
        async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
            self.inner.get(collection, id).await
        }

        async fn put(&self, collection: &str, id: &str, body: Document) -> Result<()> {
            if collection == PERSONS && self.failing.load(Ordering::SeqCst) {
                return Err(AppError::Internal("persons unavailable".to_string()));
            }
            self.inner.put(collection, id, body).await
        }

        async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
            self.inner.delete(collection, id).await
        }

        async fn find_by_field(&self, collection: &str, field: &str, value: &str) -> Result<Vec<Document>> {
            self.inner.find_by_field(collection, field, value).await
        }

        async fn list(&self, collection: &str, order: Order) -> Result<Vec<Document>> {
            self.inner.list(collection, order).await
        }
    }

    fn ticket_error(err: AppError) -> TicketError {
        match err {
            AppError::Ticket(e) => e,
            other => panic!("expected a ticket error, got {other:?}"),
        }
    }

    /// The id of the only ticket in the outbox.
    async fn mailed_ticket_id(harness: &TestHarness) -> String {
        let sent = harness.outbox.sent().await;
        assert_eq!(sent.len(), 1);
        let body = &sent[0].html_body;
        let start = body.find("resetPasswordId=").unwrap() + "resetPasswordId=".len();
        body[start..start + 26].to_string()
    }

    #[tokio::test]
    async fn issue_stores_ticket_and_mails_link() {
        let harness = TestHarness::new();
        let person_id = harness.add_person("test@example.com", Some("password123")).await;

        issue_ticket(&harness.state, "TEST@example.com").await.unwrap();

        let sent = harness.outbox.sent().await;
        assert_eq!(sent[0].to, "test@example.com");
        assert_eq!(sent[0].subject, RESET_EMAIL_SUBJECT);

        let id = mailed_ticket_id(&harness).await;
        let stored = ticket_repo::find(harness.state.store.as_ref(), &id).await.unwrap().unwrap();
        assert_eq!(stored.person_id, person_id);
    }

    #[tokio::test]
    async fn unknown_email_does_nothing_but_succeeds() {
        let harness = TestHarness::new();
        harness.add_person("test@example.com", Some("password123")).await;

        issue_ticket(&harness.state, "nobody@example.com").await.unwrap();

        assert!(harness.outbox.sent().await.is_empty());
        assert_eq!(harness.store.count(RESET_PASSWORDS).await, 0);
    }

    #[tokio::test]
    async fn second_redemption_is_not_found() {
        let harness = TestHarness::new();
        harness.add_person("test@example.com", Some("password123")).await;
        issue_ticket(&harness.state, "test@example.com").await.unwrap();
        let id = mailed_ticket_id(&harness).await;

        redeem_ticket(&harness.state, &id, "newPassword123").await.unwrap();
        let again = redeem_ticket(&harness.state, &id, "otherPassword1").await.unwrap_err();
        assert_eq!(ticket_error(again), TicketError::TicketNotFound);
    }

    #[tokio::test]
    async fn old_ticket_expires_even_if_stored() {
        let harness = TestHarness::new();
        let person_id = harness.add_person("test@example.com", Some("password123")).await;

        let stale = ResetTicket::issue(&person_id, harness.clock.now() - Duration::hours(13));
        ticket_repo::create(harness.state.store.as_ref(), &stale).await.unwrap();

        let err = redeem_ticket(&harness.state, &stale.id, "newPassword123").await.unwrap_err();
        assert_eq!(ticket_error(err), TicketError::TicketExpired);
        assert_eq!(harness.store.count(RESET_PASSWORDS).await, 1);
    }

    #[tokio::test]
    async fn malformed_and_unknown_ids() {
        let harness = TestHarness::new();

        let err = redeem_ticket(&harness.state, "testResetPasswordID", "newPassword123").await.unwrap_err();
        assert_eq!(ticket_error(err), TicketError::InvalidTicketId);

        let never_issued = ResetTicket::issue("P1", harness.clock.now()).id;
        let err = redeem_ticket(&harness.state, &never_issued, "newPassword123").await.unwrap_err();
        assert_eq!(ticket_error(err), TicketError::TicketNotFound);
    }

    #[tokio::test]
    async fn ticket_for_deleted_account() {
        let harness = TestHarness::new();
        let ticket = ResetTicket::issue("01HZZZZZZZZZZZZZZZZZZZZZZZ", harness.clock.now());
        ticket_repo::create(harness.state.store.as_ref(), &ticket).await.unwrap();

        let err = redeem_ticket(&harness.state, &ticket.id, "newPassword123").await.unwrap_err();
        assert_eq!(ticket_error(err), TicketError::AccountNotFound);
    }

    #[tokio::test]
    async fn full_reset_flow_then_login() {
        let harness = TestHarness::new();
        let person_id = harness.add_person("p1@example.com", Some("oldPassword1")).await;

        issue_ticket(&harness.state, "p1@example.com").await.unwrap();
        let id = mailed_ticket_id(&harness).await;

        harness.clock.advance(Duration::hours(13));
        let err = redeem_ticket(&harness.state, &id, "newpw123").await.unwrap_err();
        assert_eq!(ticket_error(err), TicketError::TicketExpired);

        harness.clock.advance(Duration::hours(-12));
        redeem_ticket(&harness.state, &id, "newpw123").await.unwrap();

        assert!(login(&harness.state, "p1@example.com", "oldPassword1").await.is_err());
        let token = login(&harness.state, "p1@example.com", "newpw123").await.unwrap();
        let claims = crate::crypto::session::decode(&token, &TestHarness::SESSION_KEY).unwrap();
        assert_eq!(claims.subject_id, person_id);
    }

    #[tokio::test]
    async fn failed_password_write_keeps_ticket_usable() {
        let harness = TestHarness::new();
        harness.add_person("p1@example.com", Some("oldPassword1")).await;
        issue_ticket(&harness.state, "p1@example.com").await.unwrap();
        let id = mailed_ticket_id(&harness).await;

        let store = Arc::new(FailingPersonWrites {
            inner: harness.store.clone(),
            failing: AtomicBool::new(true),
        });
        let mut state = harness.state.clone();
        state.store = store.clone();

        let err = redeem_ticket(&state, &id, "newPassword1").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(harness.store.count(RESET_PASSWORDS).await, 1);
        assert!(login(&harness.state, "p1@example.com", "oldPassword1").await.is_ok());

        store.failing.store(false, Ordering::SeqCst);
        redeem_ticket(&state, &id, "newPassword1").await.unwrap();
        assert_eq!(harness.store.count(RESET_PASSWORDS).await, 0);
        assert!(login(&harness.state, "p1@example.com", "newPassword1").await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_redemptions_have_one_winner() {
        let harness = TestHarness::new();
        harness.add_person("p1@example.com", Some("oldPassword1")).await;
        issue_ticket(&harness.state, "p1@example.com").await.unwrap();
        let id = mailed_ticket_id(&harness).await;

        let attempts: Vec<_> = (0..4)
            .map(|i| {
                let state = harness.state.clone();
                let id = id.clone();
                tokio::spawn(async move {
                    let password = format!("newPassword{}", i);
                    redeem_ticket(&state, &id, &password).await.map(|_| password)
                })
            })
            .collect();

        let mut winners = Vec::new();
        let mut not_found = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(password) => winners.push(password),
                Err(err) => {
                    assert_eq!(ticket_error(err), TicketError::TicketNotFound);
                    not_found += 1;
                }
            }
        }

        assert_eq!(winners.len(), 1);
        assert_eq!(not_found, 3);
        assert!(login(&harness.state, "p1@example.com", &winners[0]).await.is_ok());
        assert!(login(&harness.state, "p1@example.com", "oldPassword1").await.is_err());
    }
}
