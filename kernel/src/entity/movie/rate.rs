use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Currency charged per rented day. Fractional amounts are allowed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct DailyRentalRate(Decimal);

impl DailyRentalRate {
    pub fn new(rate: impl Into<Decimal>) -> Self {
        Self(rate.into())
    }
}
