use kernel::prelude::entity::{DestructGenre, Genre};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreDto {
    pub id: Uuid,
    pub name: String,
}

impl From<Genre> for GenreDto {
    fn from(value: Genre) -> Self {
        let DestructGenre { id, name } = value.into_destruct();
        Self {
            id: *id.as_ref(),
            name: name.as_ref().to_owned(),
        }
    }
}

pub struct GetGenreDto {
    pub id: Uuid,
}

pub struct CreateGenreDto {
    pub name: String,
}

pub struct UpdateGenreDto {
    pub id: Uuid,
    pub name: String,
}

pub struct DeleteGenreDto {
    pub id: Uuid,
}
