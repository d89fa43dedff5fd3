use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::crypto::session::{SessionCodec, SessionKey};
use crate::email::{BrevoEmailSender, EmailSender, Outbox};
use crate::error::Result;
use crate::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<Config>,
    /// The document store.
    pub store: Arc<dyn DocumentStore>,
    /// The email collaborator.
    pub mailer: Arc<dyn EmailSender>,
    /// Seals and opens session tokens.
    pub sessions: Arc<SessionCodec>,
    /// The time source for every expiry decision.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates a new `AppState` with the backends selected by `config`.
    pub async fn new(config: &Config) -> Result<Self> {
        let store: Arc<dyn DocumentStore> = match &config.database_url {
            Some(url) => {
                let pool = crate::db::create_pool(url)?;
                crate::db::ensure_schema(&pool).await?;
                tracing::info!("✅ PostgreSQL document store initialized");
                Arc::new(PgDocumentStore::new(pool))
            }
            None => {
                tracing::warn!("⚠️  DATABASE_URL not set, using the in-memory document store");
                Arc::new(MemoryDocumentStore::new())
            }
        };

        let mailer: Arc<dyn EmailSender> = match &config.brevo_api_key {
            Some(api_key) => {
                tracing::info!("✅ Brevo email sender initialized");
                Arc::new(BrevoEmailSender::new(
                    api_key.clone(),
                    config.email_from_name.clone(),
                    config.email_from_address.clone(),
                ))
            }
            None => {
                tracing::warn!("⚠️  BREVO_API_KEY not set, emails are only logged");
                Arc::new(Outbox::new())
            }
        };

        Self::from_parts(config.clone(), store, mailer, Arc::new(SystemClock))
    }

    /// Assembles state from explicit collaborators.
    pub fn from_parts(
        config: Config,
        store: Arc<dyn DocumentStore>,
        mailer: Arc<dyn EmailSender>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let sessions = build_codec(&config)?;
        tracing::info!("✅ Session codec initialized");

        Ok(AppState {
            config: Arc::new(config),
            store,
            mailer,
            sessions: Arc::new(sessions),
            clock,
        })
    }
}

fn build_codec(config: &Config) -> Result<SessionCodec> {
    let epoch = DateTime::<Utc>::UNIX_EPOCH;

    let mut keys = vec![SessionKey::new(&config.session_key, epoch)?];
    if let Some(previous) = &config.previous_session_key {
        keys.push(SessionKey::new(previous, epoch)?);
    }

    Ok(SessionCodec::new(
        keys,
        Duration::hours(config.session_duration_hours),
    )?)
}
