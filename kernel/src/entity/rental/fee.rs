use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::{DailyRentalRate, DateOut, ReturnedAt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct RentalFee(Decimal);

impl RentalFee {
    pub fn new(fee: impl Into<Decimal>) -> Self {
        Self(fee.into())
    }

    /// Billable days are whole elapsed days, truncated. A return on the day of
    /// rental costs nothing; a clock that runs backwards never yields a negative fee.
    pub fn calculate(date_out: &DateOut, returned_at: &ReturnedAt, rate: &DailyRentalRate) -> Self {
        let days = (*returned_at.as_ref() - *date_out.as_ref())
            .whole_days()
            .max(0);
        Self(Decimal::from(days) * *rate.as_ref())
    }
}
