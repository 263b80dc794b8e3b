use kernel::prelude::entity::{DestructMovie, Movie};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::transfer::GenreDto;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDto {
    pub id: Uuid,
    pub title: String,
    pub genre: GenreDto,
    pub daily_rental_rate: Decimal,
    pub number_in_stock: i32,
}

impl From<Movie> for MovieDto {
    fn from(value: Movie) -> Self {
        let DestructMovie {
            id,
            title,
            genre,
            daily_rental_rate,
            number_in_stock,
        } = value.into_destruct();
        Self {
            id: *id.as_ref(),
            title: title.as_ref().to_owned(),
            genre: GenreDto::from(genre),
            daily_rental_rate: *daily_rental_rate.as_ref(),
            number_in_stock: *number_in_stock.as_ref(),
        }
    }
}

pub struct GetMovieDto {
    pub id: Uuid,
}

pub struct CreateMovieDto {
    pub title: String,
    pub genre_id: Uuid,
    pub daily_rental_rate: Decimal,
    pub number_in_stock: i32,
}

/// Stock is not part of an update; it moves only through rentals and returns.
pub struct UpdateMovieDto {
    pub id: Uuid,
    pub title: String,
    pub genre_id: Uuid,
    pub daily_rental_rate: Decimal,
}

pub struct DeleteMovieDto {
    pub id: Uuid,
}
