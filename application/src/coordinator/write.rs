use std::fmt::{Display, Formatter};

use error_stack::Report;
use kernel::prelude::entity::{MovieId, Rental, RentalFee, RentalId, ReturnedAt, StockDelta};
use kernel::{Entity, KernelError};

/// One half of a paired write.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PairedWrite {
    InsertRental(Rental),
    DeleteRental(RentalId),
    CloseRental {
        rental_id: RentalId,
        returned_at: ReturnedAt,
        fee: RentalFee,
    },
    ReopenRental {
        rental_id: RentalId,
        returned_at: ReturnedAt,
    },
    AdjustStock {
        movie_id: MovieId,
        delta: StockDelta,
    },
}

impl PairedWrite {
    /// The write that undoes this one, if it can be undone.
    pub fn compensation(&self) -> Option<PairedWrite> {
        match self {
            PairedWrite::InsertRental(rental) => {
                Some(PairedWrite::DeleteRental(rental.id().clone()))
            }
            PairedWrite::CloseRental {
                rental_id,
                returned_at,
                ..
            } => Some(PairedWrite::ReopenRental {
                rental_id: rental_id.clone(),
                returned_at: returned_at.clone(),
            }),
            PairedWrite::AdjustStock { movie_id, delta } => Some(PairedWrite::AdjustStock {
                movie_id: movie_id.clone(),
                delta: delta.inverse(),
            }),
            PairedWrite::DeleteRental(_) | PairedWrite::ReopenRental { .. } => None,
        }
    }

    /// Undo writes that match nothing had nothing to undo, because the write
    /// they reverse never landed.
    pub(crate) fn tolerates_no_match(&self) -> bool {
        matches!(
            self,
            PairedWrite::DeleteRental(_) | PairedWrite::ReopenRental { .. }
        )
    }

    /// What it means when a conditional write matched nothing.
    pub(crate) fn unmatched(&self) -> Report<KernelError> {
        let context = match self {
            PairedWrite::AdjustStock {
                delta: StockDelta::Decrement,
                ..
            } => KernelError::OutOfStock,
            PairedWrite::AdjustStock {
                delta: StockDelta::Increment,
                ..
            } => KernelError::NotFound(Entity::Movie),
            PairedWrite::CloseRental { .. } => KernelError::AlreadyReturned,
            PairedWrite::InsertRental(_)
            | PairedWrite::DeleteRental(_)
            | PairedWrite::ReopenRental { .. } => KernelError::NotFound(Entity::Rental),
        };
        Report::new(context).attach_printable(format!("{self} matched nothing"))
    }
}

impl Display for PairedWrite {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PairedWrite::InsertRental(rental) => {
                write!(f, "insert rental {}", rental.id().as_ref())
            }
            PairedWrite::DeleteRental(id) => write!(f, "delete rental {}", id.as_ref()),
            PairedWrite::CloseRental { rental_id, .. } => {
                write!(f, "close rental {}", rental_id.as_ref())
            }
            PairedWrite::ReopenRental { rental_id, .. } => {
                write!(f, "reopen rental {}", rental_id.as_ref())
            }
            PairedWrite::AdjustStock { movie_id, delta } => {
                write!(
                    f,
                    "adjust stock of movie {} by {}",
                    movie_id.as_ref(),
                    delta.amount()
                )
            }
        }
    }
}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::{
        Customer, CustomerId, CustomerName, CustomerPhone, DailyRentalRate, DateOut, Genre,
        GenreId, GenreName, IsGold, Movie, MovieId, MovieTitle, NumberInStock, Rental, RentalFee,
        ReturnedAt, StockDelta,
    };
    use kernel::{Entity, KernelError};
    use uuid::Uuid;

    use super::PairedWrite;

    fn rental() -> Rental {
        let customer = Customer::new(
            CustomerId::new(Uuid::new_v4()),
            CustomerName::new("customer1"),
            IsGold::default(),
            CustomerPhone::new("1234567"),
        );
        let movie = Movie::new(
            MovieId::new(Uuid::new_v4()),
            MovieTitle::new("movie1"),
            Genre::new(GenreId::new(Uuid::new_v4()), GenreName::new("genre1")),
            DailyRentalRate::new(2),
            NumberInStock::new(1),
        );
        Rental::open(customer, &movie, DateOut::now())
    }

    #[test]
    fn compensations() {
        let rental = rental();
        let insert = PairedWrite::InsertRental(rental.clone());
        assert_eq!(
            insert.compensation(),
            Some(PairedWrite::DeleteRental(rental.id().clone()))
        );

        let returned_at = ReturnedAt::now();
        let close = PairedWrite::CloseRental {
            rental_id: rental.id().clone(),
            returned_at: returned_at.clone(),
            fee: RentalFee::new(0),
        };
        assert_eq!(
            close.compensation(),
            Some(PairedWrite::ReopenRental {
                rental_id: rental.id().clone(),
                returned_at,
            })
        );

        let decrement = PairedWrite::AdjustStock {
            movie_id: rental.movie().id().clone(),
            delta: StockDelta::Decrement,
        };
        assert_eq!(
            decrement.compensation(),
            Some(PairedWrite::AdjustStock {
                movie_id: rental.movie().id().clone(),
                delta: StockDelta::Increment,
            })
        );

        assert_eq!(PairedWrite::DeleteRental(rental.id().clone()).compensation(), None);
    }

    #[test]
    fn unmatched_conditions() {
        let rental = rental();
        let decrement = PairedWrite::AdjustStock {
            movie_id: rental.movie().id().clone(),
            delta: StockDelta::Decrement,
        };
        assert_eq!(
            decrement.unmatched().current_context(),
            &KernelError::OutOfStock
        );

        let close = PairedWrite::CloseRental {
            rental_id: rental.id().clone(),
            returned_at: ReturnedAt::now(),
            fee: RentalFee::new(0),
        };
        assert_eq!(
            close.unmatched().current_context(),
            &KernelError::AlreadyReturned
        );

        let increment = PairedWrite::AdjustStock {
            movie_id: rental.movie().id().clone(),
            delta: StockDelta::Increment,
        };
        assert_eq!(
            increment.unmatched().current_context(),
            &KernelError::NotFound(Entity::Movie)
        );
    }

    #[test]
    fn only_rental_undo_tolerates_no_match() {
        let rental = rental();
        let undos = [
            PairedWrite::InsertRental(rental.clone()),
            PairedWrite::CloseRental {
                rental_id: rental.id().clone(),
                returned_at: ReturnedAt::now(),
                fee: RentalFee::new(0),
            },
        ]
        .map(|write| write.compensation().expect("rental writes are undoable"));
        assert!(undos.iter().all(PairedWrite::tolerates_no_match));

        let restock = PairedWrite::AdjustStock {
            movie_id: rental.movie().id().clone(),
            delta: StockDelta::Increment,
        };
        assert!(!restock.tolerates_no_match());
    }
}
