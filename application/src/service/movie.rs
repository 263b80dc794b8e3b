use error_stack::Report;
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnGenreQuery, DependOnMovieQuery, GenreQuery, MovieQuery};
use kernel::interface::update::{DependOnMovieModifier, MovieModifier};
use kernel::prelude::entity::{
    DailyRentalRate, GenreId, Movie, MovieId, MovieTitle, NumberInStock,
};
use kernel::{Entity, KernelError};
use uuid::Uuid;

use crate::coordinator::within;
use crate::transfer::{CreateMovieDto, DeleteMovieDto, GetMovieDto, MovieDto, UpdateMovieDto};

#[async_trait::async_trait]
pub trait GetMovieService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnMovieQuery
{
    async fn get_movies(&self) -> error_stack::Result<Vec<MovieDto>, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let movies = within(db, self.movie_query().find_all(&mut connection)).await?;
        Ok(movies.into_iter().map(MovieDto::from).collect())
    }

    async fn get_movie(&self, dto: GetMovieDto) -> error_stack::Result<MovieDto, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let id = MovieId::new(dto.id);
        within(db, self.movie_query().find_by_id(&mut connection, &id))
            .await?
            .map(MovieDto::from)
            .ok_or_else(|| movie_not_found(dto.id))
    }
}

impl<T> GetMovieService for T where T: DependOnDatabaseConnection + DependOnMovieQuery {}

#[async_trait::async_trait]
pub trait CreateMovieService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnGenreQuery
    + DependOnMovieModifier
{
    async fn create_movie(&self, dto: CreateMovieDto) -> error_stack::Result<MovieDto, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let genre_id = GenreId::new(dto.genre_id);
        let genre = within(db, self.genre_query().find_by_id(&mut connection, &genre_id))
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound(Entity::Genre))
                    .attach_printable(format!("genre {}", dto.genre_id))
            })?;

        let movie = Movie::new(
            MovieId::new(Uuid::new_v4()),
            MovieTitle::new(dto.title),
            genre,
            DailyRentalRate::new(dto.daily_rental_rate),
            NumberInStock::new(dto.number_in_stock),
        );
        within(db, self.movie_modifier().create(&mut connection, &movie)).await?;
        within(db, connection.commit()).await?;

        Ok(MovieDto::from(movie))
    }
}

impl<T> CreateMovieService for T where
    T: DependOnDatabaseConnection + DependOnGenreQuery + DependOnMovieModifier
{
}

#[async_trait::async_trait]
pub trait UpdateMovieService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnMovieQuery
    + DependOnGenreQuery
    + DependOnMovieModifier
{
    async fn update_movie(&self, dto: UpdateMovieDto) -> error_stack::Result<MovieDto, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let id = MovieId::new(dto.id);
        let movie = within(db, self.movie_query().find_by_id(&mut connection, &id))
            .await?
            .ok_or_else(|| movie_not_found(dto.id))?;

        let genre_id = GenreId::new(dto.genre_id);
        let genre = within(db, self.genre_query().find_by_id(&mut connection, &genre_id))
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound(Entity::Genre))
                    .attach_printable(format!("genre {}", dto.genre_id))
            })?;

        let movie = movie.reconstruct(|m| {
            m.title = MovieTitle::new(dto.title);
            m.genre = genre;
            m.daily_rental_rate = DailyRentalRate::new(dto.daily_rental_rate);
        });
        within(db, self.movie_modifier().update(&mut connection, &movie)).await?;
        within(db, connection.commit()).await?;

        Ok(MovieDto::from(movie))
    }
}

impl<T> UpdateMovieService for T where
    T: DependOnDatabaseConnection + DependOnMovieQuery + DependOnGenreQuery + DependOnMovieModifier
{
}

#[async_trait::async_trait]
pub trait DeleteMovieService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnMovieQuery + DependOnMovieModifier
{
    async fn delete_movie(&self, dto: DeleteMovieDto) -> error_stack::Result<MovieDto, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let id = MovieId::new(dto.id);
        let movie = within(db, self.movie_query().find_by_id(&mut connection, &id))
            .await?
            .ok_or_else(|| movie_not_found(dto.id))?;
        within(db, self.movie_modifier().delete(&mut connection, &id)).await?;
        within(db, connection.commit()).await?;

        Ok(MovieDto::from(movie))
    }
}

impl<T> DeleteMovieService for T where
    T: DependOnDatabaseConnection + DependOnMovieQuery + DependOnMovieModifier
{
}

fn movie_not_found(id: Uuid) -> Report<KernelError> {
    Report::new(KernelError::NotFound(Entity::Movie)).attach_printable(format!("movie {id}"))
}
