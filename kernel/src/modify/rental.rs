use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Rental, RentalFee, RentalId, ReturnedAt};
use crate::KernelError;

#[async_trait::async_trait]
pub trait RentalModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Fails with [`KernelError::Conflict`] if the customer already has an open
    /// rental of the same movie.
    async fn create(
        &self,
        con: &mut Self::Transaction,
        rental: &Rental,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        rental_id: &RentalId,
    ) -> error_stack::Result<bool, KernelError>;
    /// Sets the return date and fee only while the rental is still open.
    /// Returns `false` if no open rental matched.
    async fn close(
        &self,
        con: &mut Self::Transaction,
        rental_id: &RentalId,
        returned_at: &ReturnedAt,
        fee: &RentalFee,
    ) -> error_stack::Result<bool, KernelError>;
    /// Clears the return date and fee of a rental closed at exactly `returned_at`.
    /// Returns `false` if the rental is open or was closed by someone else.
    async fn reopen(
        &self,
        con: &mut Self::Transaction,
        rental_id: &RentalId,
        returned_at: &ReturnedAt,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnRentalModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type RentalModifier: RentalModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn rental_modifier(&self) -> &Self::RentalModifier;
}
