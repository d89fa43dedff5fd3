use garde::Validate;
use serde::{Deserialize, Serialize};

/// The public part of a person record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonFields {
    #[garde(skip)]
    pub id: String,
    #[garde(length(min = 1))]
    pub first_name: String,
    #[garde(length(min = 1))]
    pub last_name: String,
    #[garde(email)]
    pub email: String,
    #[garde(skip)]
    pub street: String,
    #[garde(skip)]
    pub city: String,
    #[garde(skip)]
    pub state: String,
    #[garde(skip)]
    pub postal_code: String,
    #[garde(skip)]
    pub phone: String,
    #[garde(skip)]
    pub gender: String,
    #[garde(skip)]
    pub dob: String,
    #[garde(skip)]
    pub race: String,
    #[garde(skip)]
    pub language: String,
    #[garde(skip)]
    pub relationship: String,
    #[garde(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub household_id: Option<String>,
}

/// A stored person. Only the stored form carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(flatten)]
    pub fields: PersonFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl Person {
    pub fn id(&self) -> &str {
        &self.fields.id
    }

    pub fn email(&self) -> &str {
        &self.fields.email
    }

    /// Whether the person can log in at all.
    pub fn has_password(&self) -> bool {
        self.password_hash.as_deref().is_some_and(|h| !h.is_empty())
    }
}

/// The body of a create/update request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PersonInput {
    #[serde(flatten)]
    #[garde(dive)]
    pub fields: PersonFields,
    #[serde(default)]
    #[garde(length(min = 8, max = 128))]
    pub password: Option<String>,
}

/// Lowercases and trims an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
