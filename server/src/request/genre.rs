use application::transfer::{CreateGenreDto, DeleteGenreDto, GetGenreDto, UpdateGenreDto};
use kernel::KernelError;
use serde::Deserialize;

use crate::controller::TryIntake;
use crate::request::{check_length, parse_id};

#[derive(Debug, Deserialize)]
pub struct CreateGenreRequest {
    name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGenreRequest {
    name: String,
}

#[derive(Debug)]
pub struct GetGenreRequest {
    id: String,
}

impl GetGenreRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteGenreRequest {
    id: String,
}

impl DeleteGenreRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

pub struct GenreTransformer;

fn genre_name(name: String) -> error_stack::Result<String, KernelError> {
    check_length("name", &name, 4..=50)?;
    Ok(name)
}

impl TryIntake<CreateGenreRequest> for GenreTransformer {
    type To = CreateGenreDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, input: CreateGenreRequest) -> Result<Self::To, Self::Error> {
        Ok(CreateGenreDto {
            name: genre_name(input.name)?,
        })
    }
}

impl TryIntake<(String, UpdateGenreRequest)> for GenreTransformer {
    type To = UpdateGenreDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, input: (String, UpdateGenreRequest)) -> Result<Self::To, Self::Error> {
        let (id, input) = input;
        Ok(UpdateGenreDto {
            id: parse_id("id", &id)?,
            name: genre_name(input.name)?,
        })
    }
}

impl TryIntake<GetGenreRequest> for GenreTransformer {
    type To = GetGenreDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, input: GetGenreRequest) -> Result<Self::To, Self::Error> {
        Ok(GetGenreDto {
            id: parse_id("id", &input.id)?,
        })
    }
}

impl TryIntake<DeleteGenreRequest> for GenreTransformer {
    type To = DeleteGenreDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, input: DeleteGenreRequest) -> Result<Self::To, Self::Error> {
        Ok(DeleteGenreDto {
            id: parse_id("id", &input.id)?,
        })
    }
}
