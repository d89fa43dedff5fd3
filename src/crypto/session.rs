//! Opaque, tamper-evident session tokens.
//!
//! Wire format: `base64(nonce || AES-256-GCM("<subject_id>|<unix_seconds_expiry>"))`
//! using the standard alphabet with padding.

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Duration, Utc};

use crate::crypto::aes::{self, SecureKey};
use crate::error::TokenError;

/// Separates the subject from the expiry inside the sealed plaintext.
const SEPARATOR: char = '|';

/// Lifetime of a freshly issued token unless configured otherwise.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// The authenticated contents of a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// The account the token was issued for.
    pub subject_id: String,
    /// Absolute expiry, Unix seconds.
    pub expires_at: i64,
}

/// Seals `subject_id` into a token that expires 24 hours from now.
pub fn encode(subject_id: &str, key: &[u8]) -> Result<String, TokenError> {
    let key = SecureKey::from_slice(key)?;
    let expires_at = Utc::now() + Duration::hours(DEFAULT_SESSION_TTL_HOURS);
    seal_claims(subject_id, expires_at.timestamp(), &key)
}

/// Opens a token and returns the subject and expiry it carries.
///
/// Expiry is not enforced here; callers compare `expires_at` against their clock.
pub fn decode(token: &str, key: &[u8]) -> Result<SessionClaims, TokenError> {
    let key = SecureKey::from_slice(key)?;
    let sealed = unwrap_base64(token)?;
    open_claims(&sealed, &key)
}

fn seal_claims(subject_id: &str, expires_at: i64, key: &SecureKey) -> Result<String, TokenError> {
    if subject_id.is_empty() || subject_id.contains(SEPARATOR) {
        return Err(TokenError::InvalidSubject);
    }

    let plaintext = format!("{}{}{}", subject_id, SEPARATOR, expires_at);
    let sealed = aes::seal(key, plaintext.as_bytes())?;
    Ok(general_purpose::STANDARD.encode(sealed))
}

fn unwrap_base64(token: &str) -> Result<Vec<u8>, TokenError> {
    let sealed = general_purpose::STANDARD
        .decode(token.trim())
        .map_err(|_| TokenError::MalformedToken)?;

    if sealed.len() < aes::NONCE_SIZE {
        return Err(TokenError::TokenTooShort);
    }
    Ok(sealed)
}

fn open_claims(sealed: &[u8], key: &SecureKey) -> Result<SessionClaims, TokenError> {
    let plaintext = aes::open(key, sealed)?;
    parse_claims(&plaintext)
}

fn parse_claims(plaintext: &[u8]) -> Result<SessionClaims, TokenError> {
    let text = std::str::from_utf8(plaintext).map_err(|_| TokenError::InvalidTokenFormat)?;

    let parts: Vec<&str> = text.split(SEPARATOR).collect();
    if parts.len() != 2 {
        return Err(TokenError::InvalidTokenFormat);
    }

    let expires_at = parts[1]
        .parse::<i64>()
        .map_err(|_| TokenError::InvalidExpiry)?;

    Ok(SessionClaims {
        subject_id: parts[0].to_string(),
        expires_at,
    })
}

/// A session key together with the instant it may start signing tokens.
#[derive(Debug, Clone)]
pub struct SessionKey {
    key: SecureKey,
    valid_from: DateTime<Utc>,
}

impl SessionKey {
    pub fn new(key: &[u8], valid_from: DateTime<Utc>) -> Result<Self, TokenError> {
        Ok(Self {
            key: SecureKey::from_slice(key)?,
            valid_from,
        })
    }

    pub fn valid_from(&self) -> DateTime<Utc> {
        self.valid_from
    }
}

/// Issues and authenticates session tokens against a small key ring.
///
/// Keys are kept newest first. Issuing uses the newest key that is already
/// valid; opening tries every key newest first, so tokens sealed under a
/// retired key keep working until they expire.
#[derive(Debug, Clone)]
pub struct SessionCodec {
    keys: Vec<SessionKey>,
    ttl: Duration,
}

impl SessionCodec {
    /// Builds a codec from one or more keys. Ties on `valid_from` keep the given order.
    pub fn new(mut keys: Vec<SessionKey>, ttl: Duration) -> Result<Self, TokenError> {
        if keys.is_empty() {
            return Err(TokenError::NoActiveKey);
        }
        keys.sort_by(|a, b| b.valid_from.cmp(&a.valid_from));
        Ok(Self { keys, ttl })
    }

    /// A codec with a single key valid since the epoch and the default lifetime.
    pub fn single(key: &[u8]) -> Result<Self, TokenError> {
        Self::new(
            vec![SessionKey::new(key, DateTime::<Utc>::UNIX_EPOCH)?],
            Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        )
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Seals a token for `subject_id` expiring `ttl` after `now`.
    pub fn issue(&self, subject_id: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let signing = self
            .keys
            .iter()
            .find(|k| k.valid_from <= now)
            .ok_or(TokenError::NoActiveKey)?;

        let expires_at = (now + self.ttl).timestamp();
        seal_claims(subject_id, expires_at, &signing.key)
    }

    /// Opens a token without looking at its expiry.
    pub fn open(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let sealed = unwrap_base64(token)?;

        for candidate in &self.keys {
            match open_claims(&sealed, &candidate.key) {
                Err(TokenError::AuthenticationFailed) => continue,
                other => return other,
            }
        }
        Err(TokenError::AuthenticationFailed)
    }

    /// Opens a token and rejects it once `now` is past its expiry.
    pub fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let claims = self.open(token)?;
        if now.timestamp() > claims.expires_at {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}
