use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Movie,
    Genre,
    Customer,
    Rental,
}

impl Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Movie => write!(f, "movie"),
            Entity::Genre => write!(f, "genre"),
            Entity::Customer => write!(f, "customer"),
            Entity::Rental => write!(f, "rental"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelError {
    NotFound(Entity),
    OutOfStock,
    AlreadyReturned,
    RentalAlreadyOpen,
    /// A paired write failed and was cleanly undone. Safe to retry.
    TransactionFailed,
    /// A paired write failed and undoing its first half failed too.
    /// The ledger and the inventory may disagree until an operator intervenes.
    ReconciliationRequired,
    Timeout,
    Validation,
    /// Store-level constraint violation.
    Conflict,
    Internal,
}

impl KernelError {
    /// Stable identifier for callers that need to branch on the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            KernelError::NotFound(Entity::Movie) => "MOVIE_NOT_FOUND",
            KernelError::NotFound(Entity::Genre) => "GENRE_NOT_FOUND",
            KernelError::NotFound(Entity::Customer) => "CUSTOMER_NOT_FOUND",
            KernelError::NotFound(Entity::Rental) => "RENTAL_NOT_FOUND",
            KernelError::OutOfStock => "OUT_OF_STOCK",
            KernelError::AlreadyReturned => "ALREADY_RETURNED",
            KernelError::RentalAlreadyOpen => "RENTAL_ALREADY_OPEN",
            KernelError::TransactionFailed => "TRANSACTION_FAILED",
            KernelError::ReconciliationRequired => "RECONCILIATION_REQUIRED",
            KernelError::Timeout => "TIMEOUT",
            KernelError::Validation => "VALIDATION_FAILED",
            KernelError::Conflict => "CONFLICT",
            KernelError::Internal => "INTERNAL",
        }
    }

    /// Business-rule failures are terminal and returned to the caller untouched.
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            KernelError::NotFound(_)
                | KernelError::OutOfStock
                | KernelError::AlreadyReturned
                | KernelError::RentalAlreadyOpen
        )
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, KernelError::TransactionFailed | KernelError::Timeout)
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound(entity) => write!(f, "The {entity} was not found"),
            KernelError::OutOfStock => write!(f, "Movie not in stock"),
            KernelError::AlreadyReturned => write!(f, "Rental return already processed"),
            KernelError::RentalAlreadyOpen => {
                write!(f, "Customer already has an open rental of this movie")
            }
            KernelError::TransactionFailed => write!(f, "Transaction failed and was rolled back"),
            KernelError::ReconciliationRequired => {
                write!(f, "Rollback failed, stores require reconciliation")
            }
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Validation => write!(f, "Invalid input"),
            KernelError::Conflict => write!(f, "Constraint violation"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::{Entity, KernelError};

    const ALL: [KernelError; 13] = [
        KernelError::NotFound(Entity::Movie),
        KernelError::NotFound(Entity::Genre),
        KernelError::NotFound(Entity::Customer),
        KernelError::NotFound(Entity::Rental),
        KernelError::OutOfStock,
        KernelError::AlreadyReturned,
        KernelError::RentalAlreadyOpen,
        KernelError::TransactionFailed,
        KernelError::ReconciliationRequired,
        KernelError::Timeout,
        KernelError::Validation,
        KernelError::Conflict,
        KernelError::Internal,
    ];

    #[test]
    fn codes_are_distinct() {
        let codes = ALL.iter().map(KernelError::code).collect::<HashSet<_>>();
        assert_eq!(codes.len(), ALL.len());
    }

    #[test]
    fn reconciliation_is_never_retryable() {
        assert!(!KernelError::ReconciliationRequired.is_retryable());
        assert!(KernelError::TransactionFailed.is_retryable());
        assert!(KernelError::Timeout.is_retryable());
        assert!(!KernelError::OutOfStock.is_retryable());
    }

    #[test]
    fn business_rules() {
        assert!(KernelError::NotFound(Entity::Rental).is_business_rule());
        assert!(KernelError::AlreadyReturned.is_business_rule());
        assert!(!KernelError::Conflict.is_business_rule());
        assert!(!KernelError::TransactionFailed.is_business_rule());
    }
}
