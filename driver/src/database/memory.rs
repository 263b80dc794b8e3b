use std::collections::HashMap;
#[cfg(feature = "fault-injection")]
use std::collections::VecDeque;
#[cfg(feature = "fault-injection")]
use std::sync::Mutex;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use error_stack::Report;
use kernel::interface::database::{DatabaseConnection, Transaction, DEFAULT_OPERATION_TIMEOUT};
use kernel::interface::query::{
    DependOnCustomerQuery, DependOnGenreQuery, DependOnMovieQuery, DependOnRentalQuery,
};
use kernel::interface::update::{
    DependOnCustomerModifier, DependOnGenreModifier, DependOnMovieModifier,
    DependOnRentalModifier,
};
use kernel::prelude::entity::{
    Customer, CustomerId, Genre, GenreId, Movie, MovieId, Rental, RentalId,
};
use kernel::KernelError;

pub use self::{customer::*, genre::*, movie::*, rental::*};

mod customer;
mod genre;
mod movie;
mod rental;

/// The writes a paired operation is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultTarget {
    InsertRental,
    DeleteRental,
    CloseRental,
    ReopenRental,
    AdjustStock,
}

/// Consumed by the next write of its [`FaultTarget`].
#[cfg(feature = "fault-injection")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The write is not applied and reports an internal error.
    Fail,
    /// Sleeps, then applies the write.
    DelayBefore(Duration),
    /// Applies the write, then sleeps before returning.
    DelayAfter(Duration),
}

#[derive(Default)]
pub(in crate::database) struct Tables {
    genres: HashMap<GenreId, Genre>,
    movies: HashMap<MovieId, Movie>,
    customers: HashMap<CustomerId, Customer>,
    rentals: HashMap<RentalId, Rental>,
}

#[derive(Default)]
struct MemoryStore {
    tables: RwLock<Tables>,
    #[cfg(feature = "fault-injection")]
    faults: Mutex<HashMap<FaultTarget, VecDeque<Fault>>>,
}

#[cfg(feature = "fault-injection")]
impl MemoryStore {
    fn take_fault(&self, target: FaultTarget) -> error_stack::Result<Option<Fault>, KernelError> {
        let mut faults = self.faults.lock().map_err(|_| poisoned())?;
        Ok(faults.get_mut(&target).and_then(VecDeque::pop_front))
    }
}

/// In-process store. Every write is visible as soon as it returns, so
/// transactions on it cannot roll back.
#[derive(Clone)]
pub struct MemoryDatabase {
    store: Arc<MemoryStore>,
    timeout: Duration,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_OPERATION_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            store: Arc::new(MemoryStore::default()),
            timeout,
        }
    }

    #[cfg(feature = "fault-injection")]
    pub fn inject(&self, target: FaultTarget, fault: Fault) {
        if let Ok(mut faults) = self.store.faults.lock() {
            faults.entry(target).or_default().push_back(fault);
        }
    }
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for MemoryDatabase {
    type Transaction = MemoryTransaction;

    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        Ok(MemoryTransaction {
            store: Arc::clone(&self.store),
        })
    }

    fn operation_timeout(&self) -> Duration {
        self.timeout
    }
}

pub struct MemoryTransaction {
    store: Arc<MemoryStore>,
}

impl MemoryTransaction {
    pub(in crate::database) fn read<R>(
        &self,
        f: impl FnOnce(&Tables) -> R,
    ) -> error_stack::Result<R, KernelError> {
        let tables = self.store.tables.read().map_err(|_| poisoned())?;
        Ok(f(&tables))
    }

    pub(in crate::database) fn mutate<R>(
        &self,
        f: impl FnOnce(&mut Tables) -> R,
    ) -> error_stack::Result<R, KernelError> {
        let mut tables = self.store.tables.write().map_err(|_| poisoned())?;
        Ok(f(&mut tables))
    }

    /// A [`MemoryTransaction::mutate`] that honours injected faults for `target`.
    pub(in crate::database) async fn write<R, F>(
        &self,
        target: FaultTarget,
        f: F,
    ) -> error_stack::Result<R, KernelError>
    where
        R: Send,
        F: FnOnce(&mut Tables) -> R + Send,
    {
        #[cfg(feature = "fault-injection")]
        let fault = self.store.take_fault(target)?;
        #[cfg(feature = "fault-injection")]
        match fault {
            Some(Fault::Fail) => {
                return Err(Report::new(KernelError::Internal)
                    .attach_printable(format!("injected failure on {target:?}")))
            }
            Some(Fault::DelayBefore(delay)) => tokio::time::sleep(delay).await,
            _ => {}
        }

        tracing::trace!(?target, "memory write");
        let result = self.mutate(f)?;

        #[cfg(feature = "fault-injection")]
        if let Some(Fault::DelayAfter(delay)) = fault {
            tokio::time::sleep(delay).await;
        }
        Ok(result)
    }
}

#[async_trait::async_trait]
impl Transaction for MemoryTransaction {
    fn is_atomic(&self) -> bool {
        false
    }

    async fn commit(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

fn poisoned() -> Report<KernelError> {
    Report::new(KernelError::Internal).attach_printable("memory store lock poisoned")
}

fn duplicate(what: &str) -> Report<KernelError> {
    Report::new(KernelError::Conflict).attach_printable(format!("{what} already exists"))
}

impl DependOnGenreQuery for MemoryDatabase {
    type GenreQuery = MemoryGenreRepository;
    fn genre_query(&self) -> &Self::GenreQuery {
        &MemoryGenreRepository
    }
}

impl DependOnGenreModifier for MemoryDatabase {
    type GenreModifier = MemoryGenreRepository;
    fn genre_modifier(&self) -> &Self::GenreModifier {
        &MemoryGenreRepository
    }
}

impl DependOnMovieQuery for MemoryDatabase {
    type MovieQuery = MemoryMovieRepository;
    fn movie_query(&self) -> &Self::MovieQuery {
        &MemoryMovieRepository
    }
}

impl DependOnMovieModifier for MemoryDatabase {
    type MovieModifier = MemoryMovieRepository;
    fn movie_modifier(&self) -> &Self::MovieModifier {
        &MemoryMovieRepository
    }
}

impl DependOnCustomerQuery for MemoryDatabase {
    type CustomerQuery = MemoryCustomerRepository;
    fn customer_query(&self) -> &Self::CustomerQuery {
        &MemoryCustomerRepository
    }
}

impl DependOnCustomerModifier for MemoryDatabase {
    type CustomerModifier = MemoryCustomerRepository;
    fn customer_modifier(&self) -> &Self::CustomerModifier {
        &MemoryCustomerRepository
    }
}

impl DependOnRentalQuery for MemoryDatabase {
    type RentalQuery = MemoryRentalRepository;
    fn rental_query(&self) -> &Self::RentalQuery {
        &MemoryRentalRepository
    }
}

impl DependOnRentalModifier for MemoryDatabase {
    type RentalModifier = MemoryRentalRepository;
    fn rental_modifier(&self) -> &Self::RentalModifier {
        &MemoryRentalRepository
    }
}
