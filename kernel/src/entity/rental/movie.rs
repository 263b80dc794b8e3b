use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::References;

use crate::entity::{DailyRentalRate, Movie, MovieId, MovieTitle};

/// What a rental remembers about the movie it checked out.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct RentedMovie {
    id: MovieId,
    title: MovieTitle,
    daily_rental_rate: DailyRentalRate,
}

impl RentedMovie {
    pub fn new(id: MovieId, title: MovieTitle, daily_rental_rate: DailyRentalRate) -> Self {
        Self {
            id,
            title,
            daily_rental_rate,
        }
    }
}

impl From<&Movie> for RentedMovie {
    fn from(movie: &Movie) -> Self {
        Self::new(
            movie.id().clone(),
            movie.title().clone(),
            *movie.daily_rental_rate(),
        )
    }
}
