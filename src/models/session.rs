use chrono::{DateTime, Utc};
use serde::Serialize;

/// An authenticated request's session, attached by the auth middleware.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The person the token was issued for.
    pub person_id: String,
    /// The instant the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}
