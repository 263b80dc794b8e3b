use application::transfer::{RentalDto, RentedMovieDto};
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::Exhaust;
use crate::response::CustomerResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentedMovieResponse {
    id: Uuid,
    title: String,
    #[serde(with = "rust_decimal::serde::float")]
    daily_rental_rate: Decimal,
}

impl From<RentedMovieDto> for RentedMovieResponse {
    fn from(value: RentedMovieDto) -> Self {
        Self {
            id: value.id,
            title: value.title,
            daily_rental_rate: value.daily_rental_rate,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalResponse {
    id: Uuid,
    customer: CustomerResponse,
    movie: RentedMovieResponse,
    #[serde(with = "time::serde::rfc3339")]
    date_out: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    date_returned: Option<OffsetDateTime>,
    #[serde(with = "rust_decimal::serde::float_option")]
    rental_fee: Option<Decimal>,
}

impl From<RentalDto> for RentalResponse {
    fn from(value: RentalDto) -> Self {
        Self {
            id: value.id,
            customer: CustomerResponse::from(value.customer),
            movie: RentedMovieResponse::from(value.movie),
            date_out: value.date_out,
            date_returned: value.date_returned,
            rental_fee: value.rental_fee,
        }
    }
}

impl IntoResponse for RentalResponse {
    fn into_response(self) -> axum::response::Response {
        (axum::http::StatusCode::OK, Json(self)).into_response()
    }
}

pub struct RentalPresenter;

impl Exhaust<RentalDto> for RentalPresenter {
    type To = RentalResponse;
    fn emit(&self, input: RentalDto) -> Self::To {
        RentalResponse::from(input)
    }
}

impl Exhaust<Vec<RentalDto>> for RentalPresenter {
    type To = Json<Vec<RentalResponse>>;
    fn emit(&self, input: Vec<RentalDto>) -> Self::To {
        Json(input.into_iter().map(RentalResponse::from).collect())
    }
}
