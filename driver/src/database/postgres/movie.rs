use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::MovieQuery;
use kernel::interface::update::MovieModifier;
use kernel::prelude::entity::{
    DailyRentalRate, Genre, GenreId, GenreName, Movie, MovieId, MovieTitle, NumberInStock,
    StockDelta,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresMovieRepository;

#[async_trait::async_trait]
impl MovieQuery for PostgresMovieRepository {
    type Transaction = PostgresTransaction;

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Movie>, KernelError> {
        PgMovieInternal::find_all(con).await
    }

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &MovieId,
    ) -> error_stack::Result<Option<Movie>, KernelError> {
        PgMovieInternal::find_by_id(con, id).await
    }
}

#[async_trait::async_trait]
impl MovieModifier for PostgresMovieRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        movie: &Movie,
    ) -> error_stack::Result<(), KernelError> {
        PgMovieInternal::create(con, movie).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        movie: &Movie,
    ) -> error_stack::Result<(), KernelError> {
        PgMovieInternal::update(con, movie).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        movie_id: &MovieId,
    ) -> error_stack::Result<(), KernelError> {
        PgMovieInternal::delete(con, movie_id).await
    }

    async fn adjust_stock(
        &self,
        con: &mut PostgresTransaction,
        movie_id: &MovieId,
        delta: StockDelta,
    ) -> error_stack::Result<bool, KernelError> {
        PgMovieInternal::adjust_stock(con, movie_id, delta).await
    }
}

#[derive(sqlx::FromRow)]
struct MovieRow {
    id: Uuid,
    title: String,
    genre_id: Uuid,
    genre_name: String,
    daily_rental_rate: Decimal,
    number_in_stock: i32,
}

impl From<MovieRow> for Movie {
    fn from(value: MovieRow) -> Self {
        Movie::new(
            MovieId::new(value.id),
            MovieTitle::new(value.title),
            Genre::new(GenreId::new(value.genre_id), GenreName::new(value.genre_name)),
            DailyRentalRate::new(value.daily_rental_rate),
            NumberInStock::new(value.number_in_stock),
        )
    }
}

pub(in crate::database) struct PgMovieInternal;

impl PgMovieInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Movie>, KernelError> {
        let rows = sqlx::query_as::<_, MovieRow>(
            // language=postgresql
            r#"
            SELECT id, title, genre_id, genre_name, daily_rental_rate, number_in_stock
            FROM movies
            ORDER BY title
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn find_by_id(
        con: &mut PgConnection,
        id: &MovieId,
    ) -> error_stack::Result<Option<Movie>, KernelError> {
        let row = sqlx::query_as::<_, MovieRow>(
            // language=postgresql
            r#"
            SELECT id, title, genre_id, genre_name, daily_rental_rate, number_in_stock
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Movie::from))
    }

    async fn create(con: &mut PgConnection, movie: &Movie) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO movies (id, title, genre_id, genre_name, daily_rental_rate, number_in_stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(movie.id().as_ref())
        .bind(movie.title().as_ref())
        .bind(movie.genre().id().as_ref())
        .bind(movie.genre().name().as_ref())
        .bind(movie.daily_rental_rate().as_ref())
        .bind(movie.number_in_stock().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, movie: &Movie) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE movies
            SET title = $2, genre_id = $3, genre_name = $4, daily_rental_rate = $5
            WHERE id = $1
            "#,
        )
        .bind(movie.id().as_ref())
        .bind(movie.title().as_ref())
        .bind(movie.genre().id().as_ref())
        .bind(movie.genre().name().as_ref())
        .bind(movie.daily_rental_rate().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, id: &MovieId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn adjust_stock(
        con: &mut PgConnection,
        id: &MovieId,
        delta: StockDelta,
    ) -> error_stack::Result<bool, KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE movies
            SET number_in_stock = number_in_stock + $2
            WHERE id = $1 AND number_in_stock + $2 >= 0
            "#,
        )
        .bind(id.as_ref())
        .bind(delta.amount())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::MovieQuery;
    use kernel::interface::update::MovieModifier;
    use kernel::prelude::entity::{
        DailyRentalRate, Genre, GenreId, GenreName, Movie, MovieId, MovieTitle, NumberInStock,
        StockDelta,
    };
    use kernel::KernelError;
    use rand::Rng;

    use crate::database::postgres::{test_database, PostgresMovieRepository};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = test_database().await?;
        let mut con = db.transact().await?;
        let id = MovieId::new(uuid::Uuid::new_v4());
        let stock: i32 = rand::thread_rng().gen_range(1..=255);

        let movie = Movie::new(
            id.clone(),
            MovieTitle::new("test"),
            Genre::new(GenreId::new(uuid::Uuid::new_v4()), GenreName::new("genre")),
            DailyRentalRate::new(2),
            NumberInStock::new(stock),
        );
        PostgresMovieRepository.create(&mut con, &movie).await?;

        let found = PostgresMovieRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(movie.clone()));

        let movie = movie.reconstruct(|m| m.title = MovieTitle::new("test2"));
        PostgresMovieRepository.update(&mut con, &movie).await?;
        let found = PostgresMovieRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(movie));

        for _ in 0..stock {
            let adjusted = PostgresMovieRepository
                .adjust_stock(&mut con, &id, StockDelta::Decrement)
                .await?;
            assert!(adjusted);
        }
        let adjusted = PostgresMovieRepository
            .adjust_stock(&mut con, &id, StockDelta::Decrement)
            .await?;
        assert!(!adjusted);

        PostgresMovieRepository.delete(&mut con, &id).await?;
        let found = PostgresMovieRepository.find_by_id(&mut con, &id).await?;
        assert!(found.is_none());

        con.roll_back().await?;
        Ok(())
    }
}
