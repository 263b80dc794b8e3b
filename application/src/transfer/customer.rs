use kernel::prelude::entity::{Customer, DestructCustomer};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDto {
    pub id: Uuid,
    pub name: String,
    pub is_gold: bool,
    pub phone: String,
}

impl From<Customer> for CustomerDto {
    fn from(value: Customer) -> Self {
        let DestructCustomer {
            id,
            name,
            is_gold,
            phone,
        } = value.into_destruct();
        Self {
            id: *id.as_ref(),
            name: name.as_ref().to_owned(),
            is_gold: *is_gold.as_ref(),
            phone: phone.as_ref().to_owned(),
        }
    }
}

pub struct GetCustomerDto {
    pub id: Uuid,
}

#[derive(Debug)]
pub struct CreateCustomerDto {
    pub name: String,
    pub is_gold: bool,
    pub phone: String,
}

pub struct UpdateCustomerDto {
    pub id: Uuid,
    pub name: String,
    pub is_gold: bool,
    pub phone: String,
}

pub struct DeleteCustomerDto {
    pub id: Uuid,
}
