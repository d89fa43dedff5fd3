pub mod food_bank;
pub mod household;
pub mod item;
pub mod person;
pub mod reset_ticket;
pub mod session;
pub mod visit;

use chrono::{DateTime, Utc};
use std::time::SystemTime;
use ulid::Ulid;

/// The length of a ULID in its canonical text form.
pub const ID_LEN: usize = 26;

/// A fresh sortable id stamped with `now`.
pub fn new_id(now: DateTime<Utc>) -> String {
    Ulid::from_datetime(SystemTime::from(now)).to_string()
}

/// Replaces a missing or malformed id with a fresh one.
pub fn ensure_id(id: &mut String, now: DateTime<Utc>) {
    if id.len() != ID_LEN || Ulid::from_string(id).is_err() {
        *id = new_id(now);
    }
}

/// The creation instant embedded in a sortable id.
pub fn creation_time_of(id: &Ulid) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(id.timestamp_ms() as i64).unwrap_or(DateTime::<Utc>::MAX_UTC)
}
