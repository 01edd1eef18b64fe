use crate::domain::{AccountType, Address, TransactionType};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email must be valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    #[validate(length(min = 1, message = "Address line1 cannot be empty"))]
    pub line1: String,
    pub line2: Option<String>,
    pub line3: Option<String>,
    #[validate(length(min = 1, message = "Address town cannot be empty"))]
    pub town: String,
    pub county: Option<String>,
    #[validate(length(min = 1, message = "Address postcode cannot be empty"))]
    pub postcode: String,
}

impl From<AddressRequest> for Address {
    fn from(request: AddressRequest) -> Self {
        Address {
            line1: request.line1,
            line2: request.line2,
            line3: request.line3,
            town: request.town,
            county: request.county,
            postcode: request.postcode,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email(message = "Email must be valid"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate]
    pub address: AddressRequest,
    #[validate(length(min = 1, message = "Phone number cannot be empty"))]
    pub phone_number: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(email(message = "Email must be valid"))]
    pub email: Option<String>,
    pub name: Option<String>,
    #[validate]
    pub address: Option<AddressRequest>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, message = "Account name cannot be empty"))]
    pub name: String,
    pub account_type: AccountType,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[validate(length(max = 255, message = "Account name cannot exceed 255 characters"))]
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[validate(custom = "validate_amount_field")]
    pub amount: Decimal,
    #[validate(length(min = 1, message = "Currency cannot be empty"))]
    pub currency: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[validate(length(max = 255, message = "Reference cannot exceed 255 characters"))]
    pub reference: Option<String>,
}

fn validate_amount_field(amount: &Decimal) -> Result<(), ValidationError> {
    crate::domain::validate_amount(*amount).map_err(|_| {
        let mut err = ValidationError::new("amount");
        err.message = Some("Amount must be positive with at most 2 decimal places".into());
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn transaction_request_rejects_bad_amounts() {
        let request = CreateTransactionRequest {
            amount: dec!(0.001),
            currency: "GBP".to_string(),
            transaction_type: TransactionType::Deposit,
            reference: None,
        };
        assert!(request.validate().is_err());

        let request = CreateTransactionRequest {
            amount: dec!(25.25),
            currency: "GBP".to_string(),
            transaction_type: TransactionType::Deposit,
            reference: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn transaction_request_parses_wire_shape() {
        let request: CreateTransactionRequest = serde_json::from_str(
            r#"{"amount": "100.50", "currency": "GBP", "type": "DEPOSIT", "reference": "rent"}"#,
        )
        .unwrap();
        assert_eq!(request.amount, dec!(100.50));
        assert_eq!(request.transaction_type, TransactionType::Deposit);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn create_user_request_validates_nested_address() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{
                "email": "alice@example.com",
                "password": "longenough",
                "name": "Alice",
                "address": {"line1": "", "town": "London", "postcode": "E1 6AN"},
                "phoneNumber": "07700900000"
            }"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }
}
