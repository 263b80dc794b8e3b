use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::CustomerQuery;
use kernel::interface::update::CustomerModifier;
use kernel::prelude::entity::{Customer, CustomerId, CustomerName, CustomerPhone, IsGold};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresCustomerRepository;

#[async_trait::async_trait]
impl CustomerQuery for PostgresCustomerRepository {
    type Transaction = PostgresTransaction;

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Customer>, KernelError> {
        PgCustomerInternal::find_all(con).await
    }

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &CustomerId,
    ) -> error_stack::Result<Option<Customer>, KernelError> {
        PgCustomerInternal::find_by_id(con, id).await
    }
}

#[async_trait::async_trait]
impl CustomerModifier for PostgresCustomerRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        customer: &Customer,
    ) -> error_stack::Result<(), KernelError> {
        PgCustomerInternal::create(con, customer).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        customer: &Customer,
    ) -> error_stack::Result<(), KernelError> {
        PgCustomerInternal::update(con, customer).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        customer_id: &CustomerId,
    ) -> error_stack::Result<(), KernelError> {
        PgCustomerInternal::delete(con, customer_id).await
    }
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    is_gold: bool,
    phone: String,
}

impl From<CustomerRow> for Customer {
    fn from(value: CustomerRow) -> Self {
        Customer::new(
            CustomerId::new(value.id),
            CustomerName::new(value.name),
            IsGold::new(value.is_gold),
            CustomerPhone::new(value.phone),
        )
    }
}

pub(in crate::database) struct PgCustomerInternal;

impl PgCustomerInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Customer>, KernelError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            // language=postgresql
            r#"
            SELECT id, name, is_gold, phone
            FROM customers
            ORDER BY name
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn find_by_id(
        con: &mut PgConnection,
        id: &CustomerId,
    ) -> error_stack::Result<Option<Customer>, KernelError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            // language=postgresql
            r#"
            SELECT id, name, is_gold, phone
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Customer::from))
    }

    async fn create(
        con: &mut PgConnection,
        customer: &Customer,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO customers (id, name, is_gold, phone)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(customer.id().as_ref())
        .bind(customer.name().as_ref())
        .bind(customer.is_gold().as_ref())
        .bind(customer.phone().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(
        con: &mut PgConnection,
        customer: &Customer,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE customers
            SET name = $2, is_gold = $3, phone = $4
            WHERE id = $1
            "#,
        )
        .bind(customer.id().as_ref())
        .bind(customer.name().as_ref())
        .bind(customer.is_gold().as_ref())
        .bind(customer.phone().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, id: &CustomerId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM customers
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
