use error_stack::Report;
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{
    CustomerQuery, DependOnCustomerQuery, DependOnMovieQuery, DependOnRentalQuery, MovieQuery,
    RentalQuery,
};
use kernel::prelude::entity::{
    CustomerId, DateOut, MovieId, Rental, RentalId, ReturnedAt, StockDelta,
};
use kernel::{Entity, KernelError};
use tracing::info;

use crate::coordinator::{within, PairedWrite, TransactionCoordinator};
use crate::transfer::{CreateRentalDto, GetRentalDto, RentalDto, ReturnRentalDto};

#[async_trait::async_trait]
pub trait GetRentalService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnRentalQuery
{
    async fn get_rentals(&self) -> error_stack::Result<Vec<RentalDto>, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let rentals = within(db, self.rental_query().find_all(&mut connection)).await?;
        Ok(rentals.into_iter().map(RentalDto::from).collect())
    }

    async fn get_rental(&self, dto: GetRentalDto) -> error_stack::Result<RentalDto, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let id = RentalId::new(dto.id);
        within(db, self.rental_query().find_by_id(&mut connection, &id))
            .await?
            .map(RentalDto::from)
            .ok_or_else(|| not_found(Entity::Rental, dto.id))
    }
}

impl<T> GetRentalService for T where T: DependOnDatabaseConnection + DependOnRentalQuery {}

#[async_trait::async_trait]
pub trait RentService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnMovieQuery
    + DependOnCustomerQuery
    + DependOnRentalQuery
    + TransactionCoordinator
{
    /// Opens a rental and takes one copy out of stock as a single paired write.
    #[tracing::instrument(skip_all, fields(customer_id = %dto.customer_id, movie_id = %dto.movie_id))]
    async fn rent(&self, dto: CreateRentalDto) -> error_stack::Result<RentalDto, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let movie_id = MovieId::new(dto.movie_id);
        let movie = within(db, self.movie_query().find_by_id(&mut connection, &movie_id))
            .await?
            .ok_or_else(|| not_found(Entity::Movie, dto.movie_id))?;
        if !movie.is_in_stock() {
            return Err(Report::new(KernelError::OutOfStock)
                .attach_printable(format!("movie {}", dto.movie_id)));
        }

        let customer_id = CustomerId::new(dto.customer_id);
        let customer = within(
            db,
            self.customer_query().find_by_id(&mut connection, &customer_id),
        )
        .await?
        .ok_or_else(|| not_found(Entity::Customer, dto.customer_id))?;

        let open = within(
            db,
            self.rental_query()
                .find_open(&mut connection, &customer_id, &movie_id),
        )
        .await?;
        if let Some(open) = open {
            return Err(Report::new(KernelError::RentalAlreadyOpen)
                .attach_printable(format!("rental {}", open.id().as_ref())));
        }

        let rental = Rental::open(customer, &movie, DateOut::now());
        self.execute_paired(
            connection,
            PairedWrite::InsertRental(rental.clone()),
            PairedWrite::AdjustStock {
                movie_id,
                delta: StockDelta::Decrement,
            },
        )
        .await
        .map_err(|report| {
            // Lost the race against another rent of the same pair.
            if matches!(report.current_context(), KernelError::Conflict) {
                report.change_context(KernelError::RentalAlreadyOpen)
            } else {
                report
            }
        })?;

        info!("Rented: {}", rental.id().as_ref());
        Ok(RentalDto::from(rental))
    }
}

impl<T> RentService for T where
    T: DependOnDatabaseConnection
        + DependOnMovieQuery
        + DependOnCustomerQuery
        + DependOnRentalQuery
        + TransactionCoordinator
{
}

#[async_trait::async_trait]
pub trait ReturnService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnRentalQuery + TransactionCoordinator
{
    /// Closes the most recent rental of the pair and puts the copy back in stock.
    #[tracing::instrument(skip_all, fields(customer_id = %dto.customer_id, movie_id = %dto.movie_id))]
    async fn return_rental(
        &self,
        dto: ReturnRentalDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let customer_id = CustomerId::new(dto.customer_id);
        let movie_id = MovieId::new(dto.movie_id);
        let rental = within(
            db,
            self.rental_query()
                .find_latest(&mut connection, &customer_id, &movie_id),
        )
        .await?
        .ok_or_else(|| {
            Report::new(KernelError::NotFound(Entity::Rental)).attach_printable(format!(
                "customer {} has no rental of movie {}",
                dto.customer_id, dto.movie_id
            ))
        })?;

        let closed = rental.close(ReturnedAt::now())?;
        let (Some(returned_at), Some(fee)) = (closed.returned_at(), closed.rental_fee()) else {
            return Err(Report::new(KernelError::Internal)
                .attach_printable("closed rental without return date or fee"));
        };
        self.execute_paired(
            connection,
            PairedWrite::CloseRental {
                rental_id: closed.id().clone(),
                returned_at: returned_at.clone(),
                fee: *fee,
            },
            PairedWrite::AdjustStock {
                movie_id: closed.movie().id().clone(),
                delta: StockDelta::Increment,
            },
        )
        .await?;

        info!("Returned: {}, fee: {}", closed.id().as_ref(), fee.as_ref());
        Ok(RentalDto::from(closed))
    }
}

impl<T> ReturnService for T where
    T: DependOnDatabaseConnection + DependOnRentalQuery + TransactionCoordinator
{
}

fn not_found(entity: Entity, id: uuid::Uuid) -> Report<KernelError> {
    Report::new(KernelError::NotFound(entity)).attach_printable(format!("{entity} {id}"))
}
