mod gold;
mod id;
mod name;
mod phone;

pub use self::{gold::*, id::*, name::*, phone::*};
use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::References;

/// Rentals keep their own copy of the renting customer, so later edits here
/// never reach an existing rental.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Destructure, References)]
pub struct Customer {
    id: CustomerId,
    name: CustomerName,
    is_gold: IsGold,
    phone: CustomerPhone,
}

impl Customer {
    pub fn new(id: CustomerId, name: CustomerName, is_gold: IsGold, phone: CustomerPhone) -> Self {
        Self {
            id,
            name,
            is_gold,
            phone,
        }
    }
}
