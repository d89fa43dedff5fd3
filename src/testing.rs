//! In-process harness for unit and integration tests.
//!
//! ```rust,ignore
//! let harness = TestHarness::new();
//! let id = harness.add_person("a@b.org", Some("password123")).await;
//! let response = harness.router().oneshot(request).await?;
//! ```

use axum::Router;
use chrono::{TimeZone, Utc};
use std::sync::Arc;

use crate::clock::ManualClock;
use crate::config::Config;
use crate::email::Outbox;
use crate::models::person::{Person, PersonFields};
use crate::repositories::person as person_repo;
use crate::services::auth::hash_password;
use crate::state::AppState;
use crate::store::MemoryDocumentStore;

/// Application state wired to in-memory collaborators and a manual clock.
pub struct TestHarness {
    pub state: AppState,
    pub store: MemoryDocumentStore,
    pub outbox: Outbox,
    pub clock: Arc<ManualClock>,
}

impl TestHarness {
    pub const SESSION_KEY: [u8; 32] = *b"12345678901234567890123456789012";

    pub fn new() -> Self {
        Self::with_config(Config::new(Self::SESSION_KEY.to_vec()))
    }

    pub fn with_config(config: Config) -> Self {
        let store = MemoryDocumentStore::new();
        let outbox = Outbox::new();
        let start = Utc
            .with_ymd_and_hms(2024, 6, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let clock = Arc::new(ManualClock::new(start));

        let state = AppState::from_parts(
            config,
            Arc::new(store.clone()),
            Arc::new(outbox.clone()),
            clock.clone(),
        )
        .expect("test session key is 32 bytes");

        Self { state, store, outbox, clock }
    }

    pub fn router(&self) -> Router {
        crate::routes::build_router(self.state.clone())
    }

    /// Stores a person and returns their id.
    pub async fn add_person(&self, email: &str, password: Option<&str>) -> String {
        let password_hash = match password {
            Some(p) => Some(hash_password(p).await.expect("hashing succeeds")),
            None => None,
        };

        let mut person = Person {
            fields: PersonFields {
                id: crate::models::new_id(Utc::now()),
                first_name: "Test".into(),
                last_name: "Person".into(),
                email: email.into(),
                ..Default::default()
            },
            password_hash,
        };
        person_repo::save_person(self.state.store.as_ref(), &mut person)
            .await
            .expect("memory store never fails");
        person.fields.id
    }

    /// A session token for `person_id` issued at the harness clock.
    pub fn token_for(&self, person_id: &str) -> String {
        use crate::clock::Clock;
        self.state
            .sessions
            .issue(person_id, self.clock.now())
            .expect("subject ids from the harness are valid")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
