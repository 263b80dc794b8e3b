use std::ops::{Deref, DerefMut};
use std::time::Duration;

use error_stack::Report;
use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnCustomerQuery, DependOnGenreQuery, DependOnMovieQuery, DependOnRentalQuery,
};
use kernel::interface::update::{
    DependOnCustomerModifier, DependOnGenreModifier, DependOnMovieModifier,
    DependOnRentalModifier,
};
use kernel::KernelError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, Pool, Postgres};

use crate::config::{StoreConfig, POSTGRES_URL};
use crate::error::ConvertError;

pub use self::{customer::*, genre::*, movie::*, rental::*};

mod customer;
mod genre;
mod movie;
mod rental;

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
    timeout: Duration,
}

impl PostgresDatabase {
    pub async fn from_config(config: &StoreConfig) -> error_stack::Result<Self, KernelError> {
        let url = config.postgres_url.as_deref().ok_or_else(|| {
            Report::new(KernelError::Internal).attach_printable(format!("{POSTGRES_URL} is not set"))
        })?;
        Self::connect(url, config.operation_timeout).await
    }

    /// `timeout` bounds every store call, including waiting for a pooled connection.
    pub async fn connect(url: &str, timeout: Duration) -> error_stack::Result<Self, KernelError> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(timeout)
            .connect(url)
            .await
            .convert_error()?;
        Ok(Self { pool, timeout })
    }

    pub async fn migrate(&self) -> error_stack::Result<(), KernelError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .convert_error()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresTransaction;

    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let tx = self.pool.begin().await.convert_error()?;
        Ok(PostgresTransaction(tx))
    }

    fn operation_timeout(&self) -> Duration {
        self.timeout
    }
}

/// Dropping it without [`Transaction::commit`] rolls back.
pub struct PostgresTransaction(sqlx::Transaction<'static, Postgres>);

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    fn is_atomic(&self) -> bool {
        true
    }

    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl Deref for PostgresTransaction {
    type Target = PgConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
pub(in crate::database) async fn test_database(
) -> error_stack::Result<PostgresDatabase, KernelError> {
    use crate::config::StoreBackend;

    let config = StoreConfig::for_backend(StoreBackend::Postgres)?;
    let database = PostgresDatabase::from_config(&config).await?;
    database.migrate().await?;
    Ok(database)
}

impl DependOnGenreQuery for PostgresDatabase {
    type GenreQuery = PostgresGenreRepository;
    fn genre_query(&self) -> &Self::GenreQuery {
        &PostgresGenreRepository
    }
}

impl DependOnGenreModifier for PostgresDatabase {
    type GenreModifier = PostgresGenreRepository;
    fn genre_modifier(&self) -> &Self::GenreModifier {
        &PostgresGenreRepository
    }
}

impl DependOnMovieQuery for PostgresDatabase {
    type MovieQuery = PostgresMovieRepository;
    fn movie_query(&self) -> &Self::MovieQuery {
        &PostgresMovieRepository
    }
}

impl DependOnMovieModifier for PostgresDatabase {
    type MovieModifier = PostgresMovieRepository;
    fn movie_modifier(&self) -> &Self::MovieModifier {
        &PostgresMovieRepository
    }
}

impl DependOnCustomerQuery for PostgresDatabase {
    type CustomerQuery = PostgresCustomerRepository;
    fn customer_query(&self) -> &Self::CustomerQuery {
        &PostgresCustomerRepository
    }
}

impl DependOnCustomerModifier for PostgresDatabase {
    type CustomerModifier = PostgresCustomerRepository;
    fn customer_modifier(&self) -> &Self::CustomerModifier {
        &PostgresCustomerRepository
    }
}

impl DependOnRentalQuery for PostgresDatabase {
    type RentalQuery = PostgresRentalRepository;
    fn rental_query(&self) -> &Self::RentalQuery {
        &PostgresRentalRepository
    }
}

impl DependOnRentalModifier for PostgresDatabase {
    type RentalModifier = PostgresRentalRepository;
    fn rental_modifier(&self) -> &Self::RentalModifier {
        &PostgresRentalRepository
    }
}
