use kernel::prelude::entity::{DestructRental, DestructRentedMovie, Rental};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::transfer::CustomerDto;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentedMovieDto {
    pub id: Uuid,
    pub title: String,
    pub daily_rental_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalDto {
    pub id: Uuid,
    pub customer: CustomerDto,
    pub movie: RentedMovieDto,
    pub date_out: OffsetDateTime,
    pub date_returned: Option<OffsetDateTime>,
    pub rental_fee: Option<Decimal>,
}

impl From<Rental> for RentalDto {
    fn from(value: Rental) -> Self {
        let DestructRental {
            id,
            customer,
            movie,
            date_out,
            returned_at,
            rental_fee,
        } = value.into_destruct();
        let DestructRentedMovie {
            id: movie_id,
            title,
            daily_rental_rate,
        } = movie.into_destruct();
        Self {
            id: *id.as_ref(),
            customer: CustomerDto::from(customer),
            movie: RentedMovieDto {
                id: *movie_id.as_ref(),
                title: title.as_ref().to_owned(),
                daily_rental_rate: *daily_rental_rate.as_ref(),
            },
            date_out: *date_out.as_ref(),
            date_returned: returned_at.map(|at| *at.as_ref()),
            rental_fee: rental_fee.map(|fee| *fee.as_ref()),
        }
    }
}

pub struct GetRentalDto {
    pub id: Uuid,
}

pub struct CreateRentalDto {
    pub customer_id: Uuid,
    pub movie_id: Uuid,
}

pub struct ReturnRentalDto {
    pub customer_id: Uuid,
    pub movie_id: Uuid,
}
