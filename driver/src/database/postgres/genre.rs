use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::GenreQuery;
use kernel::interface::update::GenreModifier;
use kernel::prelude::entity::{Genre, GenreId, GenreName};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresGenreRepository;

#[async_trait::async_trait]
impl GenreQuery for PostgresGenreRepository {
    type Transaction = PostgresTransaction;

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Genre>, KernelError> {
        PgGenreInternal::find_all(con).await
    }

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &GenreId,
    ) -> error_stack::Result<Option<Genre>, KernelError> {
        PgGenreInternal::find_by_id(con, id).await
    }
}

#[async_trait::async_trait]
impl GenreModifier for PostgresGenreRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        genre: &Genre,
    ) -> error_stack::Result<(), KernelError> {
        PgGenreInternal::create(con, genre).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        genre: &Genre,
    ) -> error_stack::Result<(), KernelError> {
        PgGenreInternal::update(con, genre).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        genre_id: &GenreId,
    ) -> error_stack::Result<(), KernelError> {
        PgGenreInternal::delete(con, genre_id).await
    }
}

#[derive(sqlx::FromRow)]
struct GenreRow {
    id: Uuid,
    name: String,
}

impl From<GenreRow> for Genre {
    fn from(value: GenreRow) -> Self {
        Genre::new(GenreId::new(value.id), GenreName::new(value.name))
    }
}

pub(in crate::database) struct PgGenreInternal;

impl PgGenreInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Genre>, KernelError> {
        let rows = sqlx::query_as::<_, GenreRow>(
            // language=postgresql
            r#"
            SELECT id, name
            FROM genres
            ORDER BY name
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Genre::from).collect())
    }

    async fn find_by_id(
        con: &mut PgConnection,
        id: &GenreId,
    ) -> error_stack::Result<Option<Genre>, KernelError> {
        let row = sqlx::query_as::<_, GenreRow>(
            // language=postgresql
            r#"
            SELECT id, name
            FROM genres
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Genre::from))
    }

    async fn create(con: &mut PgConnection, genre: &Genre) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO genres (id, name)
            VALUES ($1, $2)
            "#,
        )
        .bind(genre.id().as_ref())
        .bind(genre.name().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, genre: &Genre) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE genres
            SET name = $2
            WHERE id = $1
            "#,
        )
        .bind(genre.id().as_ref())
        .bind(genre.name().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, id: &GenreId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM genres
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::GenreQuery;
    use kernel::interface::update::GenreModifier;
    use kernel::prelude::entity::{Genre, GenreId, GenreName};
    use kernel::KernelError;

    use crate::database::postgres::{test_database, PostgresGenreRepository};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = test_database().await?;
        let mut con = db.transact().await?;
        let id = GenreId::new(uuid::Uuid::new_v4());

        let genre = Genre::new(id.clone(), GenreName::new("test"));
        PostgresGenreRepository.create(&mut con, &genre).await?;

        let found = PostgresGenreRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(genre.clone()));

        let genre = genre.reconstruct(|g| g.name = GenreName::new("test2"));
        PostgresGenreRepository.update(&mut con, &genre).await?;

        let found = PostgresGenreRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(genre));

        PostgresGenreRepository.delete(&mut con, &id).await?;
        let found = PostgresGenreRepository.find_by_id(&mut con, &id).await?;
        assert!(found.is_none());

        con.roll_back().await?;
        Ok(())
    }
}
