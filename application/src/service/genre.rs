use error_stack::Report;
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnGenreQuery, GenreQuery};
use kernel::interface::update::{DependOnGenreModifier, GenreModifier};
use kernel::prelude::entity::{Genre, GenreId, GenreName};
use kernel::{Entity, KernelError};
use uuid::Uuid;

use crate::coordinator::within;
use crate::transfer::{CreateGenreDto, DeleteGenreDto, GenreDto, GetGenreDto, UpdateGenreDto};

#[async_trait::async_trait]
pub trait GetGenreService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnGenreQuery
{
    async fn get_genres(&self) -> error_stack::Result<Vec<GenreDto>, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let genres = within(db, self.genre_query().find_all(&mut connection)).await?;
        Ok(genres.into_iter().map(GenreDto::from).collect())
    }

    async fn get_genre(&self, dto: GetGenreDto) -> error_stack::Result<GenreDto, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let id = GenreId::new(dto.id);
        within(db, self.genre_query().find_by_id(&mut connection, &id))
            .await?
            .map(GenreDto::from)
            .ok_or_else(|| genre_not_found(dto.id))
    }
}

impl<T> GetGenreService for T where T: DependOnDatabaseConnection + DependOnGenreQuery {}

#[async_trait::async_trait]
pub trait CreateGenreService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnGenreModifier
{
    async fn create_genre(&self, dto: CreateGenreDto) -> error_stack::Result<GenreDto, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let genre = Genre::new(GenreId::new(Uuid::new_v4()), GenreName::new(dto.name));
        within(db, self.genre_modifier().create(&mut connection, &genre)).await?;
        within(db, connection.commit()).await?;

        Ok(GenreDto::from(genre))
    }
}

impl<T> CreateGenreService for T where T: DependOnDatabaseConnection + DependOnGenreModifier {}

#[async_trait::async_trait]
pub trait UpdateGenreService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnGenreQuery + DependOnGenreModifier
{
    /// Movies keep the genre snapshot they were created with.
    async fn update_genre(&self, dto: UpdateGenreDto) -> error_stack::Result<GenreDto, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let id = GenreId::new(dto.id);
        let genre = within(db, self.genre_query().find_by_id(&mut connection, &id))
            .await?
            .ok_or_else(|| genre_not_found(dto.id))?;
        let genre = genre.reconstruct(|g| g.name = GenreName::new(dto.name));
        within(db, self.genre_modifier().update(&mut connection, &genre)).await?;
        within(db, connection.commit()).await?;

        Ok(GenreDto::from(genre))
    }
}

impl<T> UpdateGenreService for T where
    T: DependOnDatabaseConnection + DependOnGenreQuery + DependOnGenreModifier
{
}

#[async_trait::async_trait]
pub trait DeleteGenreService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnGenreQuery + DependOnGenreModifier
{
    async fn delete_genre(&self, dto: DeleteGenreDto) -> error_stack::Result<GenreDto, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let id = GenreId::new(dto.id);
        let genre = within(db, self.genre_query().find_by_id(&mut connection, &id))
            .await?
            .ok_or_else(|| genre_not_found(dto.id))?;
        within(db, self.genre_modifier().delete(&mut connection, &id)).await?;
        within(db, connection.commit()).await?;

        Ok(GenreDto::from(genre))
    }
}

impl<T> DeleteGenreService for T where
    T: DependOnDatabaseConnection + DependOnGenreQuery + DependOnGenreModifier
{
}

fn genre_not_found(id: Uuid) -> Report<KernelError> {
    Report::new(KernelError::NotFound(Entity::Genre)).attach_printable(format!("genre {id}"))
}
