use application::transfer::{CreateMovieDto, DeleteMovieDto, GetMovieDto, UpdateMovieDto};
use kernel::KernelError;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::controller::TryIntake;
use crate::request::{check_amount, check_length, check_rate, invalid, parse_id};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    title: String,
    genre_id: String,
    number_in_stock: i64,
    daily_rental_rate: Decimal,
}

/// Stock is set when the movie is created and afterwards only moves
/// through rentals and returns, so it is rejected here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    title: String,
    genre_id: String,
    daily_rental_rate: Decimal,
    number_in_stock: Option<i64>,
}

#[derive(Debug)]
pub struct GetMovieRequest {
    id: String,
}

impl GetMovieRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteMovieRequest {
    id: String,
}

impl DeleteMovieRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

pub struct MovieTransformer;

fn movie_title(title: &str) -> error_stack::Result<String, KernelError> {
    let title = title.trim();
    check_length("title", title, 1..=255)?;
    Ok(title.to_string())
}

impl TryIntake<CreateMovieRequest> for MovieTransformer {
    type To = CreateMovieDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, input: CreateMovieRequest) -> Result<Self::To, Self::Error> {
        Ok(CreateMovieDto {
            title: movie_title(&input.title)?,
            genre_id: parse_id("genreId", &input.genre_id)?,
            daily_rental_rate: check_rate("dailyRentalRate", input.daily_rental_rate)?,
            number_in_stock: check_amount("numberInStock", input.number_in_stock)?,
        })
    }
}

impl TryIntake<(String, UpdateMovieRequest)> for MovieTransformer {
    type To = UpdateMovieDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, input: (String, UpdateMovieRequest)) -> Result<Self::To, Self::Error> {
        let (id, input) = input;
        if input.number_in_stock.is_some() {
            return Err(invalid("numberInStock cannot be changed by an update"));
        }
        Ok(UpdateMovieDto {
            id: parse_id("id", &id)?,
            title: movie_title(&input.title)?,
            genre_id: parse_id("genreId", &input.genre_id)?,
            daily_rental_rate: check_rate("dailyRentalRate", input.daily_rental_rate)?,
        })
    }
}

impl TryIntake<GetMovieRequest> for MovieTransformer {
    type To = GetMovieDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, input: GetMovieRequest) -> Result<Self::To, Self::Error> {
        Ok(GetMovieDto {
            id: parse_id("id", &input.id)?,
        })
    }
}

impl TryIntake<DeleteMovieRequest> for MovieTransformer {
    type To = DeleteMovieDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, input: DeleteMovieRequest) -> Result<Self::To, Self::Error> {
        Ok(DeleteMovieDto {
            id: parse_id("id", &input.id)?,
        })
    }
}
