use kernel::interface::query::RentalQuery;
use kernel::interface::update::RentalModifier;
use kernel::prelude::entity::{CustomerId, MovieId, Rental, RentalFee, RentalId, ReturnedAt};
use kernel::KernelError;

use crate::database::memory::{duplicate, FaultTarget, MemoryTransaction};

pub struct MemoryRentalRepository;

fn is_pair(rental: &Rental, customer_id: &CustomerId, movie_id: &MovieId) -> bool {
    rental.customer().id() == customer_id && rental.movie().id() == movie_id
}

#[async_trait::async_trait]
impl RentalQuery for MemoryRentalRepository {
    type Transaction = MemoryTransaction;

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        con.read(|tables| {
            let mut rentals = tables.rentals.values().cloned().collect::<Vec<_>>();
            rentals.sort_by(|a, b| b.date_out().as_ref().cmp(a.date_out().as_ref()));
            rentals
        })
    }

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        con.read(|tables| tables.rentals.get(id).cloned())
    }

    async fn find_latest(
        &self,
        con: &mut MemoryTransaction,
        customer_id: &CustomerId,
        movie_id: &MovieId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        con.read(|tables| {
            tables
                .rentals
                .values()
                .filter(|rental| is_pair(rental, customer_id, movie_id))
                .max_by(|a, b| a.date_out().as_ref().cmp(b.date_out().as_ref()))
                .cloned()
        })
    }

    async fn find_open(
        &self,
        con: &mut MemoryTransaction,
        customer_id: &CustomerId,
        movie_id: &MovieId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        con.read(|tables| {
            tables
                .rentals
                .values()
                .find(|rental| is_pair(rental, customer_id, movie_id) && !rental.is_returned())
                .cloned()
        })
    }
}

#[async_trait::async_trait]
impl RentalModifier for MemoryRentalRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        rental: &Rental,
    ) -> error_stack::Result<(), KernelError> {
        con.write(FaultTarget::InsertRental, |tables| {
            if tables.rentals.contains_key(rental.id()) {
                return Err(duplicate("rental"));
            }
            let customer_id = rental.customer().id();
            let movie_id = rental.movie().id();
            let open = tables
                .rentals
                .values()
                .any(|other| is_pair(other, customer_id, movie_id) && !other.is_returned());
            if open && !rental.is_returned() {
                return Err(duplicate("open rental of this movie for this customer"));
            }
            tables.rentals.insert(rental.id().clone(), rental.clone());
            Ok(())
        })
        .await?
    }

    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        rental_id: &RentalId,
    ) -> error_stack::Result<bool, KernelError> {
        con.write(FaultTarget::DeleteRental, |tables| {
            tables.rentals.remove(rental_id).is_some()
        })
        .await
    }

    async fn close(
        &self,
        con: &mut MemoryTransaction,
        rental_id: &RentalId,
        returned_at: &ReturnedAt,
        fee: &RentalFee,
    ) -> error_stack::Result<bool, KernelError> {
        con.write(FaultTarget::CloseRental, |tables| {
            match tables.rentals.get_mut(rental_id) {
                Some(stored) if !stored.is_returned() => {
                    *stored = stored.clone().reconstruct(|r| {
                        r.returned_at = Some(returned_at.clone());
                        r.rental_fee = Some(*fee);
                    });
                    true
                }
                _ => false,
            }
        })
        .await
    }

    async fn reopen(
        &self,
        con: &mut MemoryTransaction,
        rental_id: &RentalId,
        returned_at: &ReturnedAt,
    ) -> error_stack::Result<bool, KernelError> {
        con.write(FaultTarget::ReopenRental, |tables| {
            match tables.rentals.get_mut(rental_id) {
                Some(stored) if stored.returned_at().as_ref() == Some(returned_at) => {
                    *stored = stored.clone().reconstruct(|r| {
                        r.returned_at = None;
                        r.rental_fee = None;
                    });
                    true
                }
                _ => false,
            }
        })
        .await
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::RentalQuery;
    use kernel::interface::update::RentalModifier;
    use kernel::prelude::entity::{
        Customer, CustomerId, CustomerName, CustomerPhone, DailyRentalRate, DateOut, Genre,
        GenreId, GenreName, IsGold, Movie, MovieId, MovieTitle, NumberInStock, Rental,
        RentalFee, ReturnedAt,
    };
    use kernel::KernelError;
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use crate::database::{MemoryDatabase, MemoryRentalRepository};

    fn parties() -> (Customer, Movie) {
        let customer = Customer::new(
            CustomerId::new(Uuid::new_v4()),
            CustomerName::new("customer"),
            IsGold::default(),
            CustomerPhone::new("12345"),
        );
        let movie = Movie::new(
            MovieId::new(Uuid::new_v4()),
            MovieTitle::new("title"),
            Genre::new(GenreId::new(Uuid::new_v4()), GenreName::new("genre")),
            DailyRentalRate::new(2),
            NumberInStock::new(3),
        );
        (customer, movie)
    }

    #[tokio::test]
    async fn one_open_rental_per_pair() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let mut con = db.transact().await?;
        let (customer, movie) = parties();

        let first = Rental::open(customer.clone(), &movie, DateOut::now());
        MemoryRentalRepository.create(&mut con, &first).await?;

        let second = Rental::open(customer, &movie, DateOut::now());
        let result = MemoryRentalRepository.create(&mut con, &second).await;
        assert_eq!(
            result.expect_err("pair already open").current_context(),
            &KernelError::Conflict
        );
        Ok(())
    }

    #[tokio::test]
    async fn close_applies_once() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let mut con = db.transact().await?;
        let (customer, movie) = parties();
        let rental = Rental::open(customer, &movie, DateOut::now());
        MemoryRentalRepository.create(&mut con, &rental).await?;

        let returned_at = ReturnedAt::now();
        let fee = RentalFee::new(0);
        assert!(
            MemoryRentalRepository
                .close(&mut con, rental.id(), &returned_at, &fee)
                .await?
        );
        assert!(
            !MemoryRentalRepository
                .close(&mut con, rental.id(), &returned_at, &fee)
                .await?
        );

        let earlier = ReturnedAt::new(*returned_at.as_ref() - Duration::minutes(1));
        assert!(
            !MemoryRentalRepository
                .reopen(&mut con, rental.id(), &earlier)
                .await?
        );
        assert!(
            MemoryRentalRepository
                .reopen(&mut con, rental.id(), &returned_at)
                .await?
        );
        let found = MemoryRentalRepository
            .find_by_id(&mut con, rental.id())
            .await?;
        assert_eq!(found, Some(rental));
        Ok(())
    }

    #[tokio::test]
    async fn latest_is_most_recent_date_out() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let mut con = db.transact().await?;
        let (customer, movie) = parties();
        let now = OffsetDateTime::now_utc();

        let older = Rental::open(customer.clone(), &movie, DateOut::new(now - Duration::days(3)))
            .close(ReturnedAt::new(now - Duration::days(2)))?;
        let newer = Rental::open(customer.clone(), &movie, DateOut::new(now));
        MemoryRentalRepository.create(&mut con, &older).await?;
        MemoryRentalRepository.create(&mut con, &newer).await?;

        let latest = MemoryRentalRepository
            .find_latest(&mut con, customer.id(), movie.id())
            .await?;
        assert_eq!(latest, Some(newer.clone()));

        let all = MemoryRentalRepository.find_all(&mut con).await?;
        assert_eq!(all, vec![newer, older]);
        Ok(())
    }
}
