use garde::Validate;
use serde::{Deserialize, Serialize};

/// A household's visit to a food bank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct Visit {
    #[garde(skip)]
    pub id: String,
    #[garde(length(min = 1))]
    pub date: String,
    #[garde(length(min = 1))]
    pub household_id: String,
    #[garde(length(min = 1))]
    pub food_bank_id: String,
    #[garde(skip)]
    pub notes: String,
}
