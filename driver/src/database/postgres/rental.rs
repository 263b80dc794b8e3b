use rust_decimal::Decimal;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::RentalQuery;
use kernel::interface::update::RentalModifier;
use kernel::prelude::entity::{
    Customer, CustomerId, CustomerName, CustomerPhone, DailyRentalRate, DateOut, IsGold, MovieId,
    MovieTitle, Rental, RentalFee, RentalId, RentedMovie, ReturnedAt,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresRentalRepository;

#[async_trait::async_trait]
impl RentalQuery for PostgresRentalRepository {
    type Transaction = PostgresTransaction;

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        PgRentalInternal::find_all(con).await
    }

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        PgRentalInternal::find_by_id(con, id).await
    }

    async fn find_latest(
        &self,
        con: &mut PostgresTransaction,
        customer_id: &CustomerId,
        movie_id: &MovieId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        PgRentalInternal::find_latest(con, customer_id, movie_id).await
    }

    async fn find_open(
        &self,
        con: &mut PostgresTransaction,
        customer_id: &CustomerId,
        movie_id: &MovieId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        PgRentalInternal::find_open(con, customer_id, movie_id).await
    }
}

#[async_trait::async_trait]
impl RentalModifier for PostgresRentalRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        rental: &Rental,
    ) -> error_stack::Result<(), KernelError> {
        PgRentalInternal::create(con, rental).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        rental_id: &RentalId,
    ) -> error_stack::Result<bool, KernelError> {
        PgRentalInternal::delete(con, rental_id).await
    }

    async fn close(
        &self,
        con: &mut PostgresTransaction,
        rental_id: &RentalId,
        returned_at: &ReturnedAt,
        fee: &RentalFee,
    ) -> error_stack::Result<bool, KernelError> {
        PgRentalInternal::close(con, rental_id, returned_at, fee).await
    }

    async fn reopen(
        &self,
        con: &mut PostgresTransaction,
        rental_id: &RentalId,
        returned_at: &ReturnedAt,
    ) -> error_stack::Result<bool, KernelError> {
        PgRentalInternal::reopen(con, rental_id, returned_at).await
    }
}

#[derive(sqlx::FromRow)]
struct RentalRow {
    id: Uuid,
    customer_id: Uuid,
    customer_name: String,
    customer_is_gold: bool,
    customer_phone: String,
    movie_id: Uuid,
    movie_title: String,
    movie_daily_rental_rate: Decimal,
    date_out: OffsetDateTime,
    date_returned: Option<OffsetDateTime>,
    rental_fee: Option<Decimal>,
}

impl From<RentalRow> for Rental {
    fn from(value: RentalRow) -> Self {
        Rental::new(
            RentalId::new(value.id),
            Customer::new(
                CustomerId::new(value.customer_id),
                CustomerName::new(value.customer_name),
                IsGold::new(value.customer_is_gold),
                CustomerPhone::new(value.customer_phone),
            ),
            RentedMovie::new(
                MovieId::new(value.movie_id),
                MovieTitle::new(value.movie_title),
                DailyRentalRate::new(value.movie_daily_rental_rate),
            ),
            DateOut::new(value.date_out),
            value.date_returned.map(ReturnedAt::new),
            value.rental_fee.map(RentalFee::new),
        )
    }
}

pub(in crate::database) struct PgRentalInternal;

impl PgRentalInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Rental>, KernelError> {
        let rows = sqlx::query_as::<_, RentalRow>(
            // language=postgresql
            r#"
            SELECT
                id,
                customer_id, customer_name, customer_is_gold, customer_phone,
                movie_id, movie_title, movie_daily_rental_rate,
                date_out, date_returned, rental_fee
            FROM
                rentals
            ORDER BY
                date_out DESC
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Rental::from).collect())
    }

    async fn find_by_id(
        con: &mut PgConnection,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        let row = sqlx::query_as::<_, RentalRow>(
            // language=postgresql
            r#"
            SELECT
                id,
                customer_id, customer_name, customer_is_gold, customer_phone,
                movie_id, movie_title, movie_daily_rental_rate,
                date_out, date_returned, rental_fee
            FROM
                rentals
            WHERE
                id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Rental::from))
    }

    async fn find_latest(
        con: &mut PgConnection,
        customer_id: &CustomerId,
        movie_id: &MovieId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        let row = sqlx::query_as::<_, RentalRow>(
            // language=postgresql
            r#"
            SELECT
                id,
                customer_id, customer_name, customer_is_gold, customer_phone,
                movie_id, movie_title, movie_daily_rental_rate,
                date_out, date_returned, rental_fee
            FROM
                rentals
            WHERE
                customer_id = $1 AND movie_id = $2
            ORDER BY
                date_out DESC
            LIMIT 1
            "#,
        )
        .bind(customer_id.as_ref())
        .bind(movie_id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Rental::from))
    }

    async fn find_open(
        con: &mut PgConnection,
        customer_id: &CustomerId,
        movie_id: &MovieId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        let row = sqlx::query_as::<_, RentalRow>(
            // language=postgresql
            r#"
            SELECT
                id,
                customer_id, customer_name, customer_is_gold, customer_phone,
                movie_id, movie_title, movie_daily_rental_rate,
                date_out, date_returned, rental_fee
            FROM
                rentals
            WHERE
                customer_id = $1 AND movie_id = $2 AND date_returned IS NULL
            "#,
        )
        .bind(customer_id.as_ref())
        .bind(movie_id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Rental::from))
    }

    async fn create(con: &mut PgConnection, rental: &Rental) -> error_stack::Result<(), KernelError> {
        let customer = rental.customer();
        let movie = rental.movie();
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO rentals (
                id,
                customer_id, customer_name, customer_is_gold, customer_phone,
                movie_id, movie_title, movie_daily_rental_rate,
                date_out, date_returned, rental_fee
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(rental.id().as_ref())
        .bind(customer.id().as_ref())
        .bind(customer.name().as_ref())
        .bind(customer.is_gold().as_ref())
        .bind(customer.phone().as_ref())
        .bind(movie.id().as_ref())
        .bind(movie.title().as_ref())
        .bind(movie.daily_rental_rate().as_ref())
        .bind(rental.date_out().as_ref())
        .bind(rental.returned_at().as_ref().map(AsRef::<OffsetDateTime>::as_ref))
        .bind(rental.rental_fee().as_ref().map(AsRef::<Decimal>::as_ref))
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, id: &RentalId) -> error_stack::Result<bool, KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM rentals
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() == 1)
    }

    async fn close(
        con: &mut PgConnection,
        id: &RentalId,
        returned_at: &ReturnedAt,
        fee: &RentalFee,
    ) -> error_stack::Result<bool, KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE rentals
            SET date_returned = $2, rental_fee = $3
            WHERE id = $1 AND date_returned IS NULL
            "#,
        )
        .bind(id.as_ref())
        .bind(returned_at.as_ref())
        .bind(fee.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() == 1)
    }

    async fn reopen(
        con: &mut PgConnection,
        id: &RentalId,
        returned_at: &ReturnedAt,
    ) -> error_stack::Result<bool, KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE rentals
            SET date_returned = NULL, rental_fee = NULL
            WHERE id = $1 AND date_returned = $2
            "#,
        )
        .bind(id.as_ref())
        .bind(returned_at.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() == 1)
    }
}
