use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Genre, GenreId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait GenreModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        genre: &Genre,
    ) -> error_stack::Result<(), KernelError>;
    async fn update(
        &self,
        con: &mut Self::Transaction,
        genre: &Genre,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        genre_id: &GenreId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnGenreModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type GenreModifier: GenreModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn genre_modifier(&self) -> &Self::GenreModifier;
}
