use application::transfer::{CreateRentalDto, GetRentalDto, ReturnRentalDto};
use kernel::KernelError;
use serde::Deserialize;

use crate::controller::TryIntake;
use crate::request::parse_id;

/// Body of both `POST /rentals` and `POST /returns`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalRequest {
    customer_id: String,
    movie_id: String,
}

#[derive(Debug)]
pub struct ReturnRequest(RentalRequest);

impl ReturnRequest {
    pub fn new(request: RentalRequest) -> Self {
        Self(request)
    }
}

#[derive(Debug)]
pub struct GetRentalRequest {
    id: String,
}

impl GetRentalRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

pub struct RentalTransformer;

impl TryIntake<RentalRequest> for RentalTransformer {
    type To = CreateRentalDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, input: RentalRequest) -> Result<Self::To, Self::Error> {
        Ok(CreateRentalDto {
            customer_id: parse_id("customerId", &input.customer_id)?,
            movie_id: parse_id("movieId", &input.movie_id)?,
        })
    }
}

impl TryIntake<ReturnRequest> for RentalTransformer {
    type To = ReturnRentalDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, input: ReturnRequest) -> Result<Self::To, Self::Error> {
        let ReturnRequest(input) = input;
        Ok(ReturnRentalDto {
            customer_id: parse_id("customerId", &input.customer_id)?,
            movie_id: parse_id("movieId", &input.movie_id)?,
        })
    }
}

impl TryIntake<GetRentalRequest> for RentalTransformer {
    type To = GetRentalDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, input: GetRentalRequest) -> Result<Self::To, Self::Error> {
        Ok(GetRentalDto {
            id: parse_id("id", &input.id)?,
        })
    }
}
