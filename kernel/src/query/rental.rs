use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{CustomerId, MovieId, Rental, RentalId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait RentalQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Most recent `date_out` first.
    async fn find_all(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<Vec<Rental>, KernelError>;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError>;
    /// The most recent rental of `movie_id` by `customer_id`, open or closed.
    async fn find_latest(
        &self,
        con: &mut Self::Transaction,
        customer_id: &CustomerId,
        movie_id: &MovieId,
    ) -> error_stack::Result<Option<Rental>, KernelError>;
    async fn find_open(
        &self,
        con: &mut Self::Transaction,
        customer_id: &CustomerId,
        movie_id: &MovieId,
    ) -> error_stack::Result<Option<Rental>, KernelError>;
}

pub trait DependOnRentalQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type RentalQuery: RentalQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn rental_query(&self) -> &Self::RentalQuery;
}
