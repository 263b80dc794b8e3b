use kernel::interface::query::MovieQuery;
use kernel::interface::update::MovieModifier;
use kernel::prelude::entity::{Movie, MovieId, StockDelta};
use kernel::KernelError;

use crate::database::memory::{duplicate, FaultTarget, MemoryTransaction};

pub struct MemoryMovieRepository;

#[async_trait::async_trait]
impl MovieQuery for MemoryMovieRepository {
    type Transaction = MemoryTransaction;

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Movie>, KernelError> {
        con.read(|tables| {
            let mut movies = tables.movies.values().cloned().collect::<Vec<_>>();
            movies.sort_by(|a, b| a.title().as_ref().cmp(b.title().as_ref()));
            movies
        })
    }

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &MovieId,
    ) -> error_stack::Result<Option<Movie>, KernelError> {
        con.read(|tables| tables.movies.get(id).cloned())
    }
}

#[async_trait::async_trait]
impl MovieModifier for MemoryMovieRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        movie: &Movie,
    ) -> error_stack::Result<(), KernelError> {
        con.mutate(|tables| {
            if tables.movies.contains_key(movie.id()) {
                return Err(duplicate("movie"));
            }
            tables.movies.insert(movie.id().clone(), movie.clone());
            Ok(())
        })?
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        movie: &Movie,
    ) -> error_stack::Result<(), KernelError> {
        con.mutate(|tables| {
            if let Some(stored) = tables.movies.get_mut(movie.id()) {
                let stock = *stored.number_in_stock();
                *stored = movie.clone().reconstruct(|m| m.number_in_stock = stock);
            }
        })
    }

    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        movie_id: &MovieId,
    ) -> error_stack::Result<(), KernelError> {
        con.mutate(|tables| {
            tables.movies.remove(movie_id);
        })
    }

    async fn adjust_stock(
        &self,
        con: &mut MemoryTransaction,
        movie_id: &MovieId,
        delta: StockDelta,
    ) -> error_stack::Result<bool, KernelError> {
        con.write(FaultTarget::AdjustStock, |tables| {
            let Some(stored) = tables.movies.get_mut(movie_id) else {
                return false;
            };
            match stored.number_in_stock().apply(delta) {
                Some(stock) => {
                    *stored = stored.clone().reconstruct(|m| m.number_in_stock = stock);
                    true
                }
                None => false,
            }
        })
        .await
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::MovieQuery;
    use kernel::interface::update::MovieModifier;
    use kernel::prelude::entity::{
        DailyRentalRate, Genre, GenreId, GenreName, Movie, MovieId, MovieTitle, NumberInStock,
        StockDelta,
    };
    use kernel::KernelError;
    use uuid::Uuid;

    use crate::database::{MemoryDatabase, MemoryMovieRepository};

    fn movie(stock: i32) -> Movie {
        Movie::new(
            MovieId::new(Uuid::new_v4()),
            MovieTitle::new("title"),
            Genre::new(GenreId::new(Uuid::new_v4()), GenreName::new("genre")),
            DailyRentalRate::new(2),
            NumberInStock::new(stock),
        )
    }

    #[tokio::test]
    async fn stock_never_goes_negative() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let mut con = db.transact().await?;
        let movie = movie(1);
        MemoryMovieRepository.create(&mut con, &movie).await?;

        let decrement = MemoryMovieRepository
            .adjust_stock(&mut con, movie.id(), StockDelta::Decrement)
            .await?;
        assert!(decrement);
        let decrement = MemoryMovieRepository
            .adjust_stock(&mut con, movie.id(), StockDelta::Decrement)
            .await?;
        assert!(!decrement);

        let found = MemoryMovieRepository.find_by_id(&mut con, movie.id()).await?;
        assert_eq!(found.map(|m| *m.number_in_stock()), Some(NumberInStock::new(0)));
        Ok(())
    }

    #[tokio::test]
    async fn adjusting_missing_movie_matches_nothing() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let mut con = db.transact().await?;
        let id = MovieId::new(Uuid::new_v4());
        let increment = MemoryMovieRepository
            .adjust_stock(&mut con, &id, StockDelta::Increment)
            .await?;
        assert!(!increment);
        Ok(())
    }

    #[tokio::test]
    async fn update_leaves_stock_alone() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let mut con = db.transact().await?;
        let movie = movie(4);
        MemoryMovieRepository.create(&mut con, &movie).await?;

        let edited = movie.clone().reconstruct(|m| {
            m.title = MovieTitle::new("renamed");
            m.number_in_stock = NumberInStock::new(100);
        });
        MemoryMovieRepository.update(&mut con, &edited).await?;

        let found = MemoryMovieRepository
            .find_by_id(&mut con, movie.id())
            .await?
            .expect("created");
        assert_eq!(found.title(), &MovieTitle::new("renamed"));
        assert_eq!(found.number_in_stock(), &NumberInStock::new(4));
        Ok(())
    }
}
