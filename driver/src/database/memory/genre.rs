use kernel::interface::query::GenreQuery;
use kernel::interface::update::GenreModifier;
use kernel::prelude::entity::{Genre, GenreId};
use kernel::KernelError;

use crate::database::memory::{duplicate, MemoryTransaction};

pub struct MemoryGenreRepository;

#[async_trait::async_trait]
impl GenreQuery for MemoryGenreRepository {
    type Transaction = MemoryTransaction;

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Genre>, KernelError> {
        con.read(|tables| {
            let mut genres = tables.genres.values().cloned().collect::<Vec<_>>();
            genres.sort_by(|a, b| a.name().as_ref().cmp(b.name().as_ref()));
            genres
        })
    }

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &GenreId,
    ) -> error_stack::Result<Option<Genre>, KernelError> {
        con.read(|tables| tables.genres.get(id).cloned())
    }
}

#[async_trait::async_trait]
impl GenreModifier for MemoryGenreRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        genre: &Genre,
    ) -> error_stack::Result<(), KernelError> {
        con.mutate(|tables| {
            if tables.genres.contains_key(genre.id()) {
                return Err(duplicate("genre"));
            }
            tables.genres.insert(genre.id().clone(), genre.clone());
            Ok(())
        })?
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        genre: &Genre,
    ) -> error_stack::Result<(), KernelError> {
        con.mutate(|tables| {
            if let Some(stored) = tables.genres.get_mut(genre.id()) {
                *stored = genre.clone();
            }
        })
    }

    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        genre_id: &GenreId,
    ) -> error_stack::Result<(), KernelError> {
        con.mutate(|tables| {
            tables.genres.remove(genre_id);
        })
    }
}
