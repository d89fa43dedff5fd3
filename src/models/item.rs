use garde::Validate;
use serde::{Deserialize, Serialize};

/// An item a food bank hands out, priced in points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct Item {
    #[garde(skip)]
    pub id: String,
    #[garde(length(min = 1))]
    pub food_bank_id: String,
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(range(min = 0))]
    pub points: i32,
}
