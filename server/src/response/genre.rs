use application::transfer::GenreDto;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct GenreResponse {
    id: Uuid,
    name: String,
}

impl From<GenreDto> for GenreResponse {
    fn from(value: GenreDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

impl IntoResponse for GenreResponse {
    fn into_response(self) -> axum::response::Response {
        (axum::http::StatusCode::OK, Json(self)).into_response()
    }
}

pub struct GenrePresenter;

impl Exhaust<GenreDto> for GenrePresenter {
    type To = GenreResponse;
    fn emit(&self, input: GenreDto) -> Self::To {
        GenreResponse::from(input)
    }
}

impl Exhaust<Vec<GenreDto>> for GenrePresenter {
    type To = Json<Vec<GenreResponse>>;
    fn emit(&self, input: Vec<GenreDto>) -> Self::To {
        Json(input.into_iter().map(GenreResponse::from).collect())
    }
}
