use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::TicketError;
use crate::models::{creation_time_of, new_id};

/// How long a reset ticket stays redeemable after it is issued.
pub const TICKET_TTL_HOURS: i64 = 12;

/// A single-use capability to set one person's password.
///
/// No expiry is stored; it is always derived from the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetTicket {
    pub id: String,
    pub person_id: String,
}

impl ResetTicket {
    pub fn issue(person_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(now),
            person_id: person_id.to_string(),
        }
    }
}

/// Parses the id presented in a reset link.
pub fn parse_ticket_id(raw: &str) -> Result<Ulid, TicketError> {
    let raw = raw.trim();
    if raw.len() != crate::models::ID_LEN {
        return Err(TicketError::InvalidTicketId);
    }
    Ulid::from_string(raw).map_err(|_| TicketError::InvalidTicketId)
}

/// Whether a ticket with this id is past its lifetime at `now`.
pub fn is_expired(id: &Ulid, now: DateTime<Utc>) -> bool {
    now - creation_time_of(id) > Duration::hours(TICKET_TTL_HOURS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_boundary_is_inclusive() {
        let issued = Utc::now();
        let ticket = ResetTicket::issue("P1", issued);
        let id = parse_ticket_id(&ticket.id).unwrap();

        assert!(!is_expired(&id, issued + Duration::hours(1)));
        assert!(!is_expired(&id, issued + Duration::hours(TICKET_TTL_HOURS)));
        assert!(is_expired(&id, issued + Duration::hours(13)));
    }

    #[test]
    fn malformed_ids_are_rejected() {
        for raw in ["", "testResetPasswordID", "01ARZ3NDEKTSV4RRFFQ69G5FA!", "not-a-ulid-but-26-chars-xx"] {
            assert_eq!(parse_ticket_id(raw), Err(TicketError::InvalidTicketId), "{}", raw);
        }
    }
}
