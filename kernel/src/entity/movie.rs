mod id;
mod rate;
mod stock;
mod title;

pub use self::{id::*, rate::*, stock::*, title::*};
use crate::entity::Genre;
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Movie {
    id: MovieId,
    title: MovieTitle,
    genre: Genre,
    daily_rental_rate: DailyRentalRate,
    number_in_stock: NumberInStock,
}

impl Movie {
    pub fn new(
        id: MovieId,
        title: MovieTitle,
        genre: Genre,
        daily_rental_rate: DailyRentalRate,
        number_in_stock: NumberInStock,
    ) -> Self {
        Self {
            id,
            title,
            genre,
            daily_rental_rate,
            number_in_stock,
        }
    }

    pub fn is_in_stock(&self) -> bool {
        *self.number_in_stock.as_ref() > 0
    }
}
