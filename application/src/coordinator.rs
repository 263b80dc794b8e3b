mod write;

pub use self::write::*;

use std::future::Future;

use error_stack::{Report, ResultExt};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::update::{
    DependOnMovieModifier, DependOnRentalModifier, MovieModifier, RentalModifier,
};
use kernel::KernelError;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{error, warn, Instrument};

pub type TransactionOf<T> =
    <<T as DependOnDatabaseConnection>::DatabaseConnection as DatabaseConnection>::Transaction;

/// Bounds a single store call by the connection's operation timeout.
pub(crate) async fn within<D, F, T>(db: &D, future: F) -> error_stack::Result<T, KernelError>
where
    D: DatabaseConnection,
    F: Future<Output = error_stack::Result<T, KernelError>>,
{
    let limit = db.operation_timeout();
    tokio::time::timeout(limit, future).await.map_err(|_| {
        Report::new(KernelError::Timeout)
            .attach_printable(format!("store call exceeded {}ms", limit.as_millis()))
    })?
}

#[async_trait::async_trait]
pub trait TransactionCoordinator:
    'static + Clone + Sync + Send + DependOnMovieModifier + DependOnRentalModifier
{
    /// Applies `first` then `second` (ledger write first, inventory write second)
    /// so that both take effect or the failure is reported without leaving one
    /// of them behind.
    ///
    /// On an atomic transaction both writes commit or roll back together.
    /// Otherwise `first` is compensated when `second` fails, and a failed
    /// compensation surfaces as [`KernelError::ReconciliationRequired`].
    ///
    /// On a non-atomic transaction a timed-out write may still have landed.
    /// A timed-out `first` is compensated like a failed `second`. A timed-out
    /// `second` leaves the pair in an unknown state and is reported as
    /// [`KernelError::ReconciliationRequired`].
    ///
    /// The writes run on a detached task. Dropping the returned future before
    /// `second` has started undoes `first`; once `second` has started the pair
    /// is driven to completion.
    #[tracing::instrument(skip_all, fields(first = %first, second = %second))]
    async fn execute_paired(
        &self,
        con: TransactionOf<Self>,
        first: PairedWrite,
        second: PairedWrite,
    ) -> error_stack::Result<(), KernelError> {
        let (_caller, cancelled) = oneshot::channel::<()>();
        let task = tokio::spawn(
            run_paired(self.clone(), con, cancelled, first, second).in_current_span(),
        );
        task.await.change_context_lazy(|| KernelError::Internal)?
    }
}

impl<T> TransactionCoordinator for T where
    T: Clone + DependOnMovieModifier + DependOnRentalModifier
{
}

async fn run_paired<C: TransactionCoordinator>(
    coordinator: C,
    mut con: TransactionOf<C>,
    mut cancelled: oneshot::Receiver<()>,
    first: PairedWrite,
    second: PairedWrite,
) -> error_stack::Result<(), KernelError> {
    if let Err(report) = apply(&coordinator, &mut con, &first).await {
        if !con.is_atomic() && is_timeout(&report) {
            return undo(&coordinator, con, &first, report).await;
        }
        roll_back(con).await;
        return Err(classify(report));
    }

    if let Err(TryRecvError::Closed) = cancelled.try_recv() {
        let report = Report::new(KernelError::TransactionFailed)
            .attach_printable("caller cancelled before the second write");
        return undo(&coordinator, con, &first, report).await;
    }

    if let Err(report) = apply(&coordinator, &mut con, &second).await {
        if !con.is_atomic() && is_timeout(&report) {
            return Err(unsettled(&first, &second, report));
        }
        return undo(&coordinator, con, &first, classify(report)).await;
    }

    con.commit()
        .await
        .change_context(KernelError::TransactionFailed)
}

async fn undo<C: TransactionCoordinator>(
    coordinator: &C,
    mut con: TransactionOf<C>,
    first: &PairedWrite,
    cause: Report<KernelError>,
) -> error_stack::Result<(), KernelError> {
    if con.is_atomic() {
        // The server discards an unfinished transaction even if ROLLBACK never arrives.
        roll_back(con).await;
        return Err(cause);
    }

    let Some(compensation) = first.compensation() else {
        return Err(cause);
    };

    let compensated = match perform(coordinator, &mut con, &compensation).await {
        Ok(true) => Ok(()),
        Ok(false) if compensation.tolerates_no_match() => Ok(()),
        Ok(false) => Err(compensation.unmatched()),
        Err(report) => Err(report),
    };

    match compensated {
        Ok(()) => {
            if let Err(report) = con.commit().await {
                warn!("{report:?}");
            }
            Err(cause)
        }
        Err(failure) => {
            let report = failure
                .change_context(KernelError::ReconciliationRequired)
                .attach_printable(format!("{first} was applied but {compensation} failed"))
                .attach_printable(format!("original failure: {cause:?}"));
            error!(target: "reconciliation", "{report:?}");
            Err(report)
        }
    }
}

async fn roll_back<T: Transaction>(con: T) {
    if let Err(report) = con.roll_back().await {
        warn!("{report:?}");
    }
}

/// Runs one write under the operation timeout. `Ok(false)` means its
/// condition matched nothing.
async fn perform<C: TransactionCoordinator>(
    coordinator: &C,
    con: &mut TransactionOf<C>,
    write: &PairedWrite,
) -> error_stack::Result<bool, KernelError> {
    within(coordinator.database_connection(), async {
        match write {
            PairedWrite::InsertRental(rental) => coordinator
                .rental_modifier()
                .create(con, rental)
                .await
                .map(|()| true),
            PairedWrite::DeleteRental(rental_id) => {
                coordinator.rental_modifier().delete(con, rental_id).await
            }
            PairedWrite::CloseRental {
                rental_id,
                returned_at,
                fee,
            } => {
                coordinator
                    .rental_modifier()
                    .close(con, rental_id, returned_at, fee)
                    .await
            }
            PairedWrite::ReopenRental {
                rental_id,
                returned_at,
            } => {
                coordinator
                    .rental_modifier()
                    .reopen(con, rental_id, returned_at)
                    .await
            }
            PairedWrite::AdjustStock { movie_id, delta } => {
                coordinator
                    .movie_modifier()
                    .adjust_stock(con, movie_id, *delta)
                    .await
            }
        }
    })
    .await
}

async fn apply<C: TransactionCoordinator>(
    coordinator: &C,
    con: &mut TransactionOf<C>,
    write: &PairedWrite,
) -> error_stack::Result<(), KernelError> {
    if perform(coordinator, con, write).await? {
        Ok(())
    } else {
        Err(write.unmatched())
    }
}

fn is_timeout(report: &Report<KernelError>) -> bool {
    matches!(report.current_context(), KernelError::Timeout)
}

/// The second write of a non-atomic pair timed out, so whether it landed is unknown.
fn unsettled(
    first: &PairedWrite,
    second: &PairedWrite,
    cause: Report<KernelError>,
) -> Report<KernelError> {
    let report = cause
        .change_context(KernelError::ReconciliationRequired)
        .attach_printable(format!(
            "{first} was applied but the outcome of {second} is unknown"
        ));
    error!(target: "reconciliation", "{report:?}");
    report
}

/// Anything that is not a business rule, a timeout or a constraint violation
/// becomes a plain transaction failure.
fn classify(report: Report<KernelError>) -> Report<KernelError> {
    let context = *report.current_context();
    match context {
        context if context.is_business_rule() => report,
        KernelError::Timeout | KernelError::Conflict | KernelError::TransactionFailed => report,
        _ => report.change_context(KernelError::TransactionFailed),
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use driver::database::{Fault, FaultTarget, MemoryDatabase};
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::{MovieQuery, RentalQuery};
    use kernel::interface::update::{CustomerModifier, GenreModifier, MovieModifier};
    use kernel::prelude::entity::{
        Customer, CustomerId, CustomerName, CustomerPhone, DailyRentalRate, DateOut, Genre,
        GenreId, GenreName, IsGold, Movie, MovieId, MovieTitle, NumberInStock, Rental,
        RentalFee, ReturnedAt, StockDelta,
    };
    use kernel::KernelError;
    use uuid::Uuid;

    use super::{PairedWrite, TransactionCoordinator};

    async fn seed(db: &MemoryDatabase, stock: i32) -> error_stack::Result<Rental, KernelError> {
        let mut con = db.transact().await?;
        let genre = Genre::new(GenreId::new(Uuid::new_v4()), GenreName::new("genre1"));
        let movie = Movie::new(
            MovieId::new(Uuid::new_v4()),
            MovieTitle::new("movie1"),
            genre.clone(),
            DailyRentalRate::new(2),
            NumberInStock::new(stock),
        );
        let customer = Customer::new(
            CustomerId::new(Uuid::new_v4()),
            CustomerName::new("customer1"),
            IsGold::default(),
            CustomerPhone::new("1234567"),
        );
        driver::database::MemoryGenreRepository
            .create(&mut con, &genre)
            .await?;
        driver::database::MemoryMovieRepository
            .create(&mut con, &movie)
            .await?;
        driver::database::MemoryCustomerRepository
            .create(&mut con, &customer)
            .await?;
        Ok(Rental::open(customer, &movie, DateOut::now()))
    }

    fn pair(rental: &Rental) -> (PairedWrite, PairedWrite) {
        (
            PairedWrite::InsertRental(rental.clone()),
            PairedWrite::AdjustStock {
                movie_id: rental.movie().id().clone(),
                delta: StockDelta::Decrement,
            },
        )
    }

    async fn state(
        db: &MemoryDatabase,
        rental: &Rental,
    ) -> error_stack::Result<(Option<Rental>, i32), KernelError> {
        let mut con = db.transact().await?;
        let stored = driver::database::MemoryRentalRepository
            .find_by_id(&mut con, rental.id())
            .await?;
        let movie = driver::database::MemoryMovieRepository
            .find_by_id(&mut con, rental.movie().id())
            .await?
            .expect("seeded movie");
        Ok((stored, *movie.number_in_stock().as_ref()))
    }

    #[tokio::test]
    async fn both_writes_apply() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let rental = seed(&db, 1).await?;
        let (first, second) = pair(&rental);

        db.execute_paired(db.transact().await?, first, second).await?;

        let (stored, stock) = state(&db, &rental).await?;
        assert_eq!(stored, Some(rental));
        assert_eq!(stock, 0);
        Ok(())
    }

    #[tokio::test]
    async fn unmatched_second_write_compensates_first() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let rental = seed(&db, 0).await?;
        let (first, second) = pair(&rental);

        let result = db.execute_paired(db.transact().await?, first, second).await;
        let report = result.expect_err("stock is empty");
        assert_eq!(report.current_context(), &KernelError::OutOfStock);

        let (stored, stock) = state(&db, &rental).await?;
        assert_eq!(stored, None);
        assert_eq!(stock, 0);
        Ok(())
    }

    #[tokio::test]
    async fn failed_second_write_is_transaction_failure() -> error_stack::Result<(), KernelError>
    {
        let db = MemoryDatabase::new();
        let rental = seed(&db, 3).await?;
        db.inject(FaultTarget::AdjustStock, Fault::Fail);
        let (first, second) = pair(&rental);

        let result = db.execute_paired(db.transact().await?, first, second).await;
        let report = result.expect_err("stock write fails");
        assert_eq!(report.current_context(), &KernelError::TransactionFailed);
        assert!(report.current_context().is_retryable());

        let (stored, stock) = state(&db, &rental).await?;
        assert_eq!(stored, None);
        assert_eq!(stock, 3);
        Ok(())
    }

    #[tokio::test]
    async fn failed_compensation_requires_reconciliation() -> error_stack::Result<(), KernelError>
    {
        let db = MemoryDatabase::new();
        let rental = seed(&db, 3).await?;
        db.inject(FaultTarget::AdjustStock, Fault::Fail);
        db.inject(FaultTarget::DeleteRental, Fault::Fail);
        let (first, second) = pair(&rental);

        let result = db.execute_paired(db.transact().await?, first, second).await;
        let report = result.expect_err("both stock write and compensation fail");
        assert_eq!(
            report.current_context(),
            &KernelError::ReconciliationRequired
        );
        assert!(!report.current_context().is_retryable());

        // The orphaned rental is left behind for an operator.
        let (stored, stock) = state(&db, &rental).await?;
        assert_eq!(stored, Some(rental));
        assert_eq!(stock, 3);
        Ok(())
    }

    #[tokio::test]
    async fn cancelled_before_second_write_rolls_back() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let rental = seed(&db, 3).await?;
        db.inject(
            FaultTarget::InsertRental,
            Fault::DelayAfter(Duration::from_millis(200)),
        );
        let (first, second) = pair(&rental);

        let con = db.transact().await?;
        let cancelled = tokio::time::timeout(
            Duration::from_millis(50),
            db.execute_paired(con, first, second),
        )
        .await;
        assert!(cancelled.is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        let (stored, stock) = state(&db, &rental).await?;
        assert_eq!(stored, None);
        assert_eq!(stock, 3);
        Ok(())
    }

    #[tokio::test]
    async fn timed_out_first_write_is_compensated() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::with_timeout(Duration::from_millis(50));
        let rental = seed(&db, 3).await?;
        // The insert lands but reports back too late.
        db.inject(
            FaultTarget::InsertRental,
            Fault::DelayAfter(Duration::from_millis(200)),
        );
        let (first, second) = pair(&rental);

        let result = db.execute_paired(db.transact().await?, first, second).await;
        let report = result.expect_err("rental insert times out");
        assert_eq!(report.current_context(), &KernelError::Timeout);
        assert!(report.current_context().is_retryable());

        let (stored, stock) = state(&db, &rental).await?;
        assert_eq!(stored, None);
        assert_eq!(stock, 3);
        Ok(())
    }

    #[tokio::test]
    async fn timed_out_first_write_that_never_landed() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::with_timeout(Duration::from_millis(50));
        let rental = seed(&db, 3).await?;
        db.inject(
            FaultTarget::InsertRental,
            Fault::DelayBefore(Duration::from_millis(200)),
        );
        let (first, second) = pair(&rental);

        let result = db.execute_paired(db.transact().await?, first, second).await;
        let report = result.expect_err("rental insert times out");
        assert_eq!(report.current_context(), &KernelError::Timeout);

        let (stored, stock) = state(&db, &rental).await?;
        assert_eq!(stored, None);
        assert_eq!(stock, 3);
        Ok(())
    }

    #[tokio::test]
    async fn timed_out_second_write_requires_reconciliation(
    ) -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::with_timeout(Duration::from_millis(50));
        let rental = seed(&db, 3).await?;
        // The decrement lands but reports back too late.
        db.inject(
            FaultTarget::AdjustStock,
            Fault::DelayAfter(Duration::from_millis(200)),
        );
        let (first, second) = pair(&rental);

        let result = db.execute_paired(db.transact().await?, first, second).await;
        let report = result.expect_err("stock write times out");
        assert_eq!(
            report.current_context(),
            &KernelError::ReconciliationRequired
        );
        assert!(!report.current_context().is_retryable());

        // Nothing is undone, so both writes stay applied.
        let (stored, stock) = state(&db, &rental).await?;
        assert_eq!(stored, Some(rental));
        assert_eq!(stock, 2);
        Ok(())
    }

    #[tokio::test]
    async fn timed_out_close_is_reopened() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::with_timeout(Duration::from_millis(50));
        let rental = seed(&db, 3).await?;
        let (first, second) = pair(&rental);
        db.execute_paired(db.transact().await?, first, second).await?;

        let returned_at = ReturnedAt::now();
        let fee = RentalFee::calculate(
            rental.date_out(),
            &returned_at,
            rental.movie().daily_rental_rate(),
        );
        db.inject(
            FaultTarget::CloseRental,
            Fault::DelayAfter(Duration::from_millis(200)),
        );
        let close = PairedWrite::CloseRental {
            rental_id: rental.id().clone(),
            returned_at,
            fee,
        };
        let restock = PairedWrite::AdjustStock {
            movie_id: rental.movie().id().clone(),
            delta: StockDelta::Increment,
        };

        let result = db.execute_paired(db.transact().await?, close, restock).await;
        let report = result.expect_err("close times out");
        assert_eq!(report.current_context(), &KernelError::Timeout);

        let (stored, stock) = state(&db, &rental).await?;
        let stored = stored.expect("rental is kept");
        assert_eq!(stored.returned_at(), &None);
        assert_eq!(stock, 2);
        Ok(())
    }
}
