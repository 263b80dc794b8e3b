use application::transfer::CustomerDto;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    id: Uuid,
    name: String,
    is_gold: bool,
    phone: String,
}

impl From<CustomerDto> for CustomerResponse {
    fn from(value: CustomerDto) -> Self {
        let CustomerDto {
            id,
            name,
            is_gold,
            phone,
        } = value;
        Self {
            id,
            name,
            is_gold,
            phone,
        }
    }
}

impl IntoResponse for CustomerResponse {
    fn into_response(self) -> axum::response::Response {
        (axum::http::StatusCode::OK, Json(self)).into_response()
    }
}

pub struct CustomerPresenter;

impl Exhaust<CustomerDto> for CustomerPresenter {
    type To = CustomerResponse;
    fn emit(&self, input: CustomerDto) -> Self::To {
        CustomerResponse::from(input)
    }
}

impl Exhaust<Vec<CustomerDto>> for CustomerPresenter {
    type To = Json<Vec<CustomerResponse>>;
    fn emit(&self, input: Vec<CustomerDto>) -> Self::To {
        Json(input.into_iter().map(CustomerResponse::from).collect())
    }
}
