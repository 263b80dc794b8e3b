use error_stack::Report;
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{CustomerQuery, DependOnCustomerQuery};
use kernel::interface::update::{CustomerModifier, DependOnCustomerModifier};
use kernel::prelude::entity::{Customer, CustomerId, CustomerName, CustomerPhone, IsGold};
use kernel::{Entity, KernelError};
use uuid::Uuid;

use crate::coordinator::within;
use crate::transfer::{
    CreateCustomerDto, CustomerDto, DeleteCustomerDto, GetCustomerDto, UpdateCustomerDto,
};

#[async_trait::async_trait]
pub trait GetCustomerService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnCustomerQuery
{
    async fn get_customers(&self) -> error_stack::Result<Vec<CustomerDto>, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let customers = within(db, self.customer_query().find_all(&mut connection)).await?;
        Ok(customers.into_iter().map(CustomerDto::from).collect())
    }

    async fn get_customer(
        &self,
        dto: GetCustomerDto,
    ) -> error_stack::Result<CustomerDto, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let id = CustomerId::new(dto.id);
        within(db, self.customer_query().find_by_id(&mut connection, &id))
            .await?
            .map(CustomerDto::from)
            .ok_or_else(|| customer_not_found(dto.id))
    }
}

impl<T> GetCustomerService for T where T: DependOnDatabaseConnection + DependOnCustomerQuery {}

#[async_trait::async_trait]
pub trait CreateCustomerService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnCustomerModifier
{
    async fn create_customer(
        &self,
        dto: CreateCustomerDto,
    ) -> error_stack::Result<CustomerDto, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let customer = Customer::new(
            CustomerId::new(Uuid::new_v4()),
            CustomerName::new(dto.name),
            IsGold::new(dto.is_gold),
            CustomerPhone::new(dto.phone),
        );
        within(db, self.customer_modifier().create(&mut connection, &customer)).await?;
        within(db, connection.commit()).await?;

        Ok(CustomerDto::from(customer))
    }
}

impl<T> CreateCustomerService for T where
    T: DependOnDatabaseConnection + DependOnCustomerModifier
{
}

#[async_trait::async_trait]
pub trait UpdateCustomerService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnCustomerQuery
    + DependOnCustomerModifier
{
    /// Existing rentals keep the customer snapshot taken when they were opened.
    async fn update_customer(
        &self,
        dto: UpdateCustomerDto,
    ) -> error_stack::Result<CustomerDto, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let id = CustomerId::new(dto.id);
        let customer = within(db, self.customer_query().find_by_id(&mut connection, &id))
            .await?
            .ok_or_else(|| customer_not_found(dto.id))?;
        let customer = customer.reconstruct(|c| {
            c.name = CustomerName::new(dto.name);
            c.is_gold = IsGold::new(dto.is_gold);
            c.phone = CustomerPhone::new(dto.phone);
        });
        within(db, self.customer_modifier().update(&mut connection, &customer)).await?;
        within(db, connection.commit()).await?;

        Ok(CustomerDto::from(customer))
    }
}

impl<T> UpdateCustomerService for T where
    T: DependOnDatabaseConnection + DependOnCustomerQuery + DependOnCustomerModifier
{
}

#[async_trait::async_trait]
pub trait DeleteCustomerService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnCustomerQuery
    + DependOnCustomerModifier
{
    async fn delete_customer(
        &self,
        dto: DeleteCustomerDto,
    ) -> error_stack::Result<CustomerDto, KernelError> {
        let db = self.database_connection();
        let mut connection = within(db, db.transact()).await?;

        let id = CustomerId::new(dto.id);
        let customer = within(db, self.customer_query().find_by_id(&mut connection, &id))
            .await?
            .ok_or_else(|| customer_not_found(dto.id))?;
        within(db, self.customer_modifier().delete(&mut connection, &id)).await?;
        within(db, connection.commit()).await?;

        Ok(CustomerDto::from(customer))
    }
}

impl<T> DeleteCustomerService for T where
    T: DependOnDatabaseConnection + DependOnCustomerQuery + DependOnCustomerModifier
{
}

fn customer_not_found(id: Uuid) -> Report<KernelError> {
    Report::new(KernelError::NotFound(Entity::Customer))
        .attach_printable(format!("customer {id}"))
}

#[cfg(test)]
mod test {
    use driver::database::MemoryDatabase;
    use kernel::{Entity, KernelError};
    use rust_decimal_macros::dec;

    use crate::service::{
        CreateCustomerService, CreateGenreService, CreateMovieService, DeleteCustomerService,
        GetCustomerService, GetRentalService, RentService, UpdateCustomerService,
    };
    use crate::transfer::{
        CreateCustomerDto, CreateGenreDto, CreateMovieDto, CreateRentalDto, DeleteCustomerDto,
        GetCustomerDto, GetRentalDto, UpdateCustomerDto,
    };

    #[tokio::test]
    async fn rental_keeps_customer_snapshot() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let genre = db
            .create_genre(CreateGenreDto {
                name: "genre1".to_string(),
            })
            .await?;
        let movie = db
            .create_movie(CreateMovieDto {
                title: "title1".to_string(),
                genre_id: genre.id,
                daily_rental_rate: dec!(2),
                number_in_stock: 5,
            })
            .await?;
        let customer = db
            .create_customer(CreateCustomerDto {
                name: "name1".to_string(),
                is_gold: false,
                phone: "1234567".to_string(),
            })
            .await?;
        assert_eq!(
            db.get_customer(GetCustomerDto { id: customer.id }).await?,
            customer
        );

        let rental = db
            .rent(CreateRentalDto {
                customer_id: customer.id,
                movie_id: movie.id,
            })
            .await?;

        let updated = db
            .update_customer(UpdateCustomerDto {
                id: customer.id,
                name: "name2".to_string(),
                is_gold: true,
                phone: "7654321".to_string(),
            })
            .await?;
        assert!(updated.is_gold);

        let stored = db.get_rental(GetRentalDto { id: rental.id }).await?;
        assert_eq!(stored.customer, customer);

        db.delete_customer(DeleteCustomerDto { id: customer.id })
            .await?;
        assert!(db.get_customers().await?.is_empty());
        let missing = db.get_customer(GetCustomerDto { id: customer.id }).await;
        assert_eq!(
            missing.expect_err("deleted").current_context(),
            &KernelError::NotFound(Entity::Customer)
        );

        // Deleting the customer leaves its rental history intact.
        let stored = db.get_rental(GetRentalDto { id: rental.id }).await?;
        assert_eq!(stored.customer.name, "name1");
        Ok(())
    }
}
