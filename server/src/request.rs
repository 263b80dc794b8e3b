use std::ops::RangeInclusive;

use error_stack::Report;
use kernel::KernelError;
use rust_decimal::Decimal;
use uuid::Uuid;

pub use self::{customer::*, genre::*, movie::*, rental::*};

mod customer;
mod genre;
mod movie;
mod rental;

pub(crate) fn invalid(reason: impl Into<String>) -> Report<KernelError> {
    Report::new(KernelError::Validation).attach_printable(reason.into())
}

pub(crate) fn parse_id(field: &str, value: &str) -> error_stack::Result<Uuid, KernelError> {
    Uuid::parse_str(value.trim()).map_err(|_| invalid(format!("{field} must be a UUID")))
}

/// Length is counted in characters, not bytes.
pub(crate) fn check_length(
    field: &str,
    value: &str,
    bounds: RangeInclusive<usize>,
) -> error_stack::Result<(), KernelError> {
    let length = value.chars().count();
    if bounds.contains(&length) {
        Ok(())
    } else {
        Err(invalid(format!(
            "{field} must be {} to {} characters long",
            bounds.start(),
            bounds.end()
        )))
    }
}

pub(crate) fn check_amount(field: &str, value: i64) -> error_stack::Result<i32, KernelError> {
    const BOUNDS: RangeInclusive<i64> = 0..=255;
    if BOUNDS.contains(&value) {
        i32::try_from(value).map_err(|_| invalid(format!("{field} is out of range")))
    } else {
        Err(invalid(format!(
            "{field} must be between {} and {}",
            BOUNDS.start(),
            BOUNDS.end()
        )))
    }
}

/// Currency amounts stop at the cent.
pub(crate) fn check_rate(
    field: &str,
    value: Decimal,
) -> error_stack::Result<Decimal, KernelError> {
    let bounds = Decimal::ZERO..=Decimal::from(255);
    if !bounds.contains(&value) {
        return Err(invalid(format!(
            "{field} must be between {} and {}",
            bounds.start(),
            bounds.end()
        )));
    }
    if value.normalize().scale() > 2 {
        return Err(invalid(format!("{field} must have at most two decimal places")));
    }
    Ok(value)
}
