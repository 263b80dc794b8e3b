use application::transfer::{
    CreateCustomerDto, DeleteCustomerDto, GetCustomerDto, UpdateCustomerDto,
};
use kernel::KernelError;
use serde::Deserialize;

use crate::controller::TryIntake;
use crate::request::{check_length, parse_id};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    name: String,
    #[serde(default)]
    is_gold: bool,
    phone: String,
}

#[derive(Debug)]
pub struct GetCustomerRequest {
    id: String,
}

impl GetCustomerRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteCustomerRequest {
    id: String,
}

impl DeleteCustomerRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

pub struct CustomerTransformer;

impl CustomerRequest {
    fn validate(self) -> error_stack::Result<Self, KernelError> {
        check_length("name", &self.name, 4..=50)?;
        check_length("phone", &self.phone, 5..=11)?;
        Ok(self)
    }
}

impl TryIntake<CustomerRequest> for CustomerTransformer {
    type To = CreateCustomerDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, input: CustomerRequest) -> Result<Self::To, Self::Error> {
        let CustomerRequest {
            name,
            is_gold,
            phone,
        } = input.validate()?;
        Ok(CreateCustomerDto {
            name,
            is_gold,
            phone,
        })
    }
}

impl TryIntake<(String, CustomerRequest)> for CustomerTransformer {
    type To = UpdateCustomerDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, input: (String, CustomerRequest)) -> Result<Self::To, Self::Error> {
        let (id, input) = input;
        let id = parse_id("id", &id)?;
        let CustomerRequest {
            name,
            is_gold,
            phone,
        } = input.validate()?;
        Ok(UpdateCustomerDto {
            id,
            name,
            is_gold,
            phone,
        })
    }
}

impl TryIntake<GetCustomerRequest> for CustomerTransformer {
    type To = GetCustomerDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, input: GetCustomerRequest) -> Result<Self::To, Self::Error> {
        Ok(GetCustomerDto {
            id: parse_id("id", &input.id)?,
        })
    }
}

impl TryIntake<DeleteCustomerRequest> for CustomerTransformer {
    type To = DeleteCustomerDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, input: DeleteCustomerRequest) -> Result<Self::To, Self::Error> {
        Ok(DeleteCustomerDto {
            id: parse_id("id", &input.id)?,
        })
    }
}

#[cfg(test)]
mod test {
    use kernel::KernelError;

    use super::{CustomerRequest, CustomerTransformer};
    use crate::controller::TryIntake;

    fn request(json: &str) -> CustomerRequest {
        serde_json::from_str(json).expect("well-formed request")
    }

    #[test]
    fn gold_defaults_to_false() {
        let dto = TryIntake::<CustomerRequest>::emit(
            &CustomerTransformer,
            request(r#"{"name": "customer1", "phone": "1234567"}"#),
        )
        .expect("valid customer");
        assert!(!dto.is_gold);
    }

    #[test]
    fn phone_length_is_checked() {
        let result = TryIntake::<CustomerRequest>::emit(
            &CustomerTransformer,
            request(r#"{"name": "customer1", "phone": "123", "isGold": true}"#),
        );
        assert_eq!(
            result.expect_err("phone too short").current_context(),
            &KernelError::Validation
        );
    }
}
