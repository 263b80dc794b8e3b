use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Movie, MovieId, StockDelta};
use crate::KernelError;

#[async_trait::async_trait]
pub trait MovieModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        movie: &Movie,
    ) -> error_stack::Result<(), KernelError>;
    /// Writes everything except `number_in_stock`, which only moves through
    /// [`MovieModifier::adjust_stock`].
    async fn update(
        &self,
        con: &mut Self::Transaction,
        movie: &Movie,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        movie_id: &MovieId,
    ) -> error_stack::Result<(), KernelError>;
    /// Atomic compare-and-adjust: applies `delta` only while the counter stays
    /// non-negative. Returns `false` if no row matched.
    async fn adjust_stock(
        &self,
        con: &mut Self::Transaction,
        movie_id: &MovieId,
        delta: StockDelta,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnMovieModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type MovieModifier: MovieModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn movie_modifier(&self) -> &Self::MovieModifier;
}
