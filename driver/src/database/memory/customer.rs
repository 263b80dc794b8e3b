use kernel::interface::query::CustomerQuery;
use kernel::interface::update::CustomerModifier;
use kernel::prelude::entity::{Customer, CustomerId};
use kernel::KernelError;

use crate::database::memory::{duplicate, MemoryTransaction};

pub struct MemoryCustomerRepository;

#[async_trait::async_trait]
impl CustomerQuery for MemoryCustomerRepository {
    type Transaction = MemoryTransaction;

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Customer>, KernelError> {
        con.read(|tables| {
            let mut customers = tables.customers.values().cloned().collect::<Vec<_>>();
            customers.sort_by(|a, b| a.name().as_ref().cmp(b.name().as_ref()));
            customers
        })
    }

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &CustomerId,
    ) -> error_stack::Result<Option<Customer>, KernelError> {
        con.read(|tables| tables.customers.get(id).cloned())
    }
}

#[async_trait::async_trait]
impl CustomerModifier for MemoryCustomerRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        customer: &Customer,
    ) -> error_stack::Result<(), KernelError> {
        con.mutate(|tables| {
            if tables.customers.contains_key(customer.id()) {
                return Err(duplicate("customer"));
            }
            tables
                .customers
                .insert(customer.id().clone(), customer.clone());
            Ok(())
        })?
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        customer: &Customer,
    ) -> error_stack::Result<(), KernelError> {
        con.mutate(|tables| {
            if let Some(stored) = tables.customers.get_mut(customer.id()) {
                *stored = customer.clone();
            }
        })
    }

    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        customer_id: &CustomerId,
    ) -> error_stack::Result<(), KernelError> {
        con.mutate(|tables| {
            tables.customers.remove(customer_id);
        })
    }
}
