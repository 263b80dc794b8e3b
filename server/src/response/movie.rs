use application::transfer::MovieDto;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::controller::Exhaust;
use crate::response::GenreResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    id: Uuid,
    title: String,
    genre: GenreResponse,
    number_in_stock: i32,
    #[serde(with = "rust_decimal::serde::float")]
    daily_rental_rate: Decimal,
}

impl From<MovieDto> for MovieResponse {
    fn from(value: MovieDto) -> Self {
        Self {
            id: value.id,
            title: value.title,
            genre: GenreResponse::from(value.genre),
            number_in_stock: value.number_in_stock,
            daily_rental_rate: value.daily_rental_rate,
        }
    }
}

impl IntoResponse for MovieResponse {
    fn into_response(self) -> axum::response::Response {
        (axum::http::StatusCode::OK, Json(self)).into_response()
    }
}

pub struct MoviePresenter;

impl Exhaust<MovieDto> for MoviePresenter {
    type To = MovieResponse;
    fn emit(&self, input: MovieDto) -> Self::To {
        MovieResponse::from(input)
    }
}

impl Exhaust<Vec<MovieDto>> for MoviePresenter {
    type To = Json<Vec<MovieResponse>>;
    fn emit(&self, input: Vec<MovieDto>) -> Self::To {
        Json(input.into_iter().map(MovieResponse::from).collect())
    }
}
