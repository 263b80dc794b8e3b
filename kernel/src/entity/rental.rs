mod date;
mod fee;
mod id;
mod movie;

pub use self::{date::*, fee::*, id::*, movie::*};
use crate::entity::{Customer, Movie};
use crate::KernelError;
use destructure::Destructure;
use error_stack::Report;
use uuid::Uuid;
use vodca::References;

/// A ledger record. Open while `returned_at` is `None`; closing it is one-way.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Rental {
    id: RentalId,
    customer: Customer,
    movie: RentedMovie,
    date_out: DateOut,
    returned_at: Option<ReturnedAt>,
    rental_fee: Option<RentalFee>,
}

impl Rental {
    pub fn new(
        id: RentalId,
        customer: Customer,
        movie: RentedMovie,
        date_out: DateOut,
        returned_at: Option<ReturnedAt>,
        rental_fee: Option<RentalFee>,
    ) -> Self {
        Self {
            id,
            customer,
            movie,
            date_out,
            returned_at,
            rental_fee,
        }
    }

    /// Snapshots both parties as they are right now.
    pub fn open(customer: Customer, movie: &Movie, date_out: DateOut) -> Self {
        Self::new(
            RentalId::new(Uuid::new_v4()),
            customer,
            RentedMovie::from(movie),
            date_out,
            None,
            None,
        )
    }

    pub fn is_returned(&self) -> bool {
        self.returned_at.is_some()
    }

    /// Charges the snapshot rate, not whatever the movie costs today.
    pub fn close(self, returned_at: ReturnedAt) -> error_stack::Result<Self, KernelError> {
        if self.is_returned() {
            return Err(Report::new(KernelError::AlreadyReturned)
                .attach_printable(format!("rental {}", self.id.as_ref())));
        }
        let fee = RentalFee::calculate(
            &self.date_out,
            &returned_at,
            self.movie.daily_rental_rate(),
        );
        Ok(self.reconstruct(|rental| {
            rental.returned_at = Some(returned_at);
            rental.rental_fee = Some(fee);
        }))
    }
}

#[cfg(test)]
mod test {
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use crate::entity::{
        Customer, CustomerId, CustomerName, CustomerPhone, DailyRentalRate, DateOut, Genre,
        GenreId, GenreName, IsGold, Movie, MovieId, MovieTitle, NumberInStock, Rental, RentalFee,
        ReturnedAt,
    };
    use crate::KernelError;

    fn customer() -> Customer {
        Customer::new(
            CustomerId::new(Uuid::new_v4()),
            CustomerName::new("customer1"),
            IsGold::default(),
            CustomerPhone::new("1234567"),
        )
    }

    fn movie(rate: i32) -> Movie {
        Movie::new(
            MovieId::new(Uuid::new_v4()),
            MovieTitle::new("movie1"),
            Genre::new(GenreId::new(Uuid::new_v4()), GenreName::new("genre1")),
            DailyRentalRate::new(rate),
            NumberInStock::new(5),
        )
    }

    #[test]
    fn open_snapshots_movie() {
        let movie = movie(2);
        let rental = Rental::open(customer(), &movie, DateOut::now());
        assert_eq!(rental.movie().id(), movie.id());
        assert_eq!(rental.movie().daily_rental_rate(), movie.daily_rental_rate());
        assert!(!rental.is_returned());
        assert!(rental.rental_fee().is_none());
    }

    #[test]
    fn close_charges_whole_days() -> error_stack::Result<(), KernelError> {
        let now = OffsetDateTime::now_utc();
        let rental = Rental::open(customer(), &movie(2), DateOut::new(now - Duration::days(7)));
        let closed = rental.close(ReturnedAt::new(now))?;
        assert!(closed.is_returned());
        assert_eq!(closed.rental_fee(), &Some(RentalFee::new(14)));
        Ok(())
    }

    #[test]
    fn close_twice_is_rejected() -> error_stack::Result<(), KernelError> {
        let rental = Rental::open(customer(), &movie(2), DateOut::now());
        let closed = rental.close(ReturnedAt::now())?;
        let again = closed.close(ReturnedAt::now());
        assert!(matches!(
            again.map_err(|report| *report.current_context()),
            Err(KernelError::AlreadyReturned)
        ));
        Ok(())
    }
}
