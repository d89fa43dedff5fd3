use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::models::creation_time_of;

/// The most members a single signup may list besides the head.
pub const MAX_MEMBERS: usize = 5;

/// A person listed on a household registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct HouseholdMember {
    #[garde(length(min = 1))]
    pub first_name: String,
    #[garde(skip)]
    pub last_name: String,
    #[garde(email)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[garde(skip)]
    pub street: String,
    #[garde(skip)]
    pub city: String,
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
}

/// A registered household.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct Household {
    #[garde(skip)]
    pub id: String,
    #[garde(dive, custom(head_is_complete))]
    pub head: HouseholdMember,
    #[garde(length(max = 5), dive)]
    pub members: Vec<HouseholdMember>,
}

fn head_is_complete(head: &HouseholdMember, _ctx: &()) -> garde::Result {
    if head.last_name.trim().is_empty() {
        return Err(garde::Error::new("head of household needs a last name"));
    }
    if head.dob.trim().is_empty() {
        return Err(garde::Error::new("head of household needs a date of birth"));
    }
    Ok(())
}

impl Household {
    /// When the household registered, read from its id.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        Ulid::from_string(&self.id).ok().map(|id| creation_time_of(&id))
    }

    /// The head followed by every member.
    pub fn everyone(&self) -> Vec<HouseholdMember> {
        std::iter::once(self.head.clone())
            .chain(self.members.iter().cloned())
            .collect()
    }
}

/// One row of the household listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdSummary {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub members: usize,
    pub created: Option<DateTime<Utc>>,
}

impl From<&Household> for HouseholdSummary {
    fn from(household: &Household) -> Self {
        Self {
            id: household.id.clone(),
            first_name: household.head.first_name.clone(),
            last_name: household.head.last_name.clone(),
            dob: household.head.dob.clone(),
            members: household.members.len(),
            created: household.created(),
        }
    }
}
