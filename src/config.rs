use std::env;
use anyhow::{Context, Result};
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::aes::KEY_SIZE;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The key that seals new session tokens.
    pub session_key: Zeroizing<Vec<u8>>,
    /// A retired key whose tokens are still accepted.
    pub previous_session_key: Option<Zeroizing<Vec<u8>>>,
    /// The lifetime of a session token in hours.
    pub session_duration_hours: i64,
    /// The URL of the PostgreSQL database; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// The Brevo API key; emails stay in the outbox when absent.
    pub brevo_api_key: Option<String>,
    /// The display name emails are sent from.
    pub email_from_name: String,
    /// The address emails are sent from.
    pub email_from_address: String,
    /// The prefix of links placed in emails.
    pub public_base_url: String,
    /// The address the server listens on.
    pub bind_addr: String,
    /// The browser origin allowed by CORS.
    pub cors_origin: String,
    /// Whether the unauthenticated routes are rate limited.
    pub rate_limit_enabled: bool,
    /// Whether cookies are marked `Secure`.
    pub production: bool,
}

impl Config {
    /// A configuration with defaults for everything except the session key.
    pub fn new(session_key: Vec<u8>) -> Self {
        Self {
            session_key: Zeroizing::new(session_key),
            previous_session_key: None,
            session_duration_hours: 24,
            database_url: None,
            brevo_api_key: None,
            email_from_name: "Community Cupboard".to_string(),
            email_from_address: "no-reply@localhost".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
            bind_addr: "127.0.0.1:8080".to_string(),
            cors_origin: "http://localhost:3000".to_string(),
            rate_limit_enabled: false,
            production: false,
        }
    }

    /// Creates a new `Config` from environment variables.
    pub fn from_env() -> Result<Self> {
        let session_key = read_key("SESSION_KEY")?
            .context("SESSION_KEY must be set (generate with: openssl rand -hex 32)")?;

        let mut config = Self::new(session_key.to_vec());
        config.previous_session_key = read_key("SESSION_KEY_PREVIOUS")?;

        config.session_duration_hours = env::var("SESSION_DURATION_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .context("Invalid SESSION_DURATION_HOURS")?;
        if config.session_duration_hours <= 0 {
            anyhow::bail!("SESSION_DURATION_HOURS must be positive");
        }

        config.database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        config.brevo_api_key = env::var("BREVO_API_KEY").ok().filter(|v| !v.is_empty());

        if let Ok(name) = env::var("EMAIL_FROM_NAME") {
            config.email_from_name = name;
        }
        if let Ok(address) = env::var("EMAIL_FROM_ADDRESS") {
            config.email_from_address = address;
        }
        if let Ok(url) = env::var("PUBLIC_BASE_URL") {
            config.public_base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(addr) = env::var("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(origin) = env::var("CORS_ORIGIN") {
            config.cors_origin = origin;
        }

        config.rate_limit_enabled = env::var("RATE_LIMIT_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .context("Invalid RATE_LIMIT_ENABLED")?;

        config.production = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            == "production";

        Ok(config)
    }
}

/// Reads a hex-encoded 32-byte key, wiping the hex text afterwards.
fn read_key(name: &str) -> Result<Option<Zeroizing<Vec<u8>>>> {
    let Ok(mut key_hex) = env::var(name) else {
        return Ok(None);
    };

    let decoded = hex::decode(key_hex.trim());
    key_hex.zeroize();
    let key_bytes = Zeroizing::new(
        decoded.with_context(|| format!("{} must be valid hexadecimal", name))?,
    );

    if key_bytes.len() != KEY_SIZE {
        anyhow::bail!("{} must be exactly 32 bytes (64 hex characters)", name);
    }

    Ok(Some(key_bytes))
}
