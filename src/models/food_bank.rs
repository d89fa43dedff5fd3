use garde::Validate;
use serde::{Deserialize, Serialize};

/// A postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    #[garde(length(min = 1))]
    pub street1: String,
    #[garde(skip)]
    pub street2: String,
    #[garde(length(min = 1))]
    pub city: String,
    #[garde(length(min = 1))]
    pub state: String,
    #[garde(length(min = 1))]
    pub zip: String,
    #[garde(length(min = 1))]
    pub country: String,
}

/// A food bank location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct FoodBank {
    #[garde(skip)]
    pub id: String,
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(dive)]
    pub address: Address,
}
