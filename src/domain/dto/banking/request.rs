//! Tutor payout request DTOs.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddBankAccountRequest {
    #[validate(length(min = 1, max = 100, message = "Account name is required"))]
    pub account_name: String,

    #[validate(length(equal = 10, message = "Account number must be 10 digits"))]
    #[validate(custom(function = "validate_digits"))]
    pub account_number: String,

    #[validate(length(min = 1, message = "Bank name is required"))]
    pub bank_name: String,

    #[validate(length(min = 1, message = "Bank code is required"))]
    pub bank_code: String,
}

fn validate_digits(value: &str) -> Result<(), ValidationError> {
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("not_numeric")
            .with_message("Account number must contain only digits".into()));
    }
    Ok(())
}

/// `amount` is the gross earnings amount; the platform charge comes off
/// before transfer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WithdrawalRequest {
    #[validate(length(min = 1, message = "Bank account id is required"))]
    pub bank_account_id: String,

    #[validate(range(min = 100.0, message = "Minimum withdrawal is 100"))]
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_number_must_be_ten_digits() {
        let mut req = AddBankAccountRequest {
            account_name: "Ada Obi".into(),
            account_number: "0123456789".into(),
            bank_name: "First Bank".into(),
            bank_code: "011".into(),
        };
        assert!(req.validate().is_ok());

        req.account_number = "01234".into();
        assert!(req.validate().is_err());

        req.account_number = "01234abcde".into();
        assert!(req.validate().is_err());
    }
}
