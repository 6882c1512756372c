//! Tutor earnings and payouts: bank accounts, balances and withdrawals.

use mongodb::bson::oid::ObjectId;
use singleton_macro::service;
use std::sync::Arc;

use crate::config::PaystackConfig;
use crate::domain::dto::banking::request::{AddBankAccountRequest, WithdrawalRequest};
use crate::domain::dto::banking::response::{
    BankAccountResponse, EarningsResponse, WithdrawalResponse,
};
use crate::domain::entities::banking::bank_account::BankAccount;
use crate::domain::entities::banking::withdrawal::Withdrawal;
use crate::errors::errors::AppError;
use crate::repositories::banking::bank_account_repo::BankAccountRepository;
use crate::repositories::banking::withdrawal_repo::WithdrawalRepository;
use crate::repositories::courses::course_repo::CourseRepository;
use crate::services::payments::paystack_service::{Bank, PaystackService};

#[service(name = "payout")]
pub struct PayoutService {
    bankaccount_repo: Arc<BankAccountRepository>,
    withdrawal_repo: Arc<WithdrawalRepository>,
    course_repo: Arc<CourseRepository>,
}

impl PayoutService {
    pub async fn add_bank_account(
        &self,
        tutor_id: &str,
        request: AddBankAccountRequest,
    ) -> Result<BankAccountResponse, AppError> {
        let tutor_oid = ObjectId::parse_str(tutor_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let account = self
            .bankaccount_repo
            .create(BankAccount::new(
                tutor_oid,
                request.account_name,
                request.account_number,
                request.bank_name,
                request.bank_code,
            ))
            .await?;

        Ok(BankAccountResponse::from(account))
    }

    pub async fn list_bank_accounts(
        &self,
        tutor_id: &str,
    ) -> Result<Vec<BankAccountResponse>, AppError> {
        let tutor_oid = ObjectId::parse_str(tutor_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let accounts = self.bankaccount_repo.find_by_tutor(&tutor_oid).await?;
        Ok(accounts.into_iter().map(BankAccountResponse::from).collect())
    }

    pub async fn remove_bank_account(&self, tutor_id: &str, id: &str) -> Result<(), AppError> {
        let tutor_oid = ObjectId::parse_str(tutor_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        if !self.bankaccount_repo.deactivate(&tutor_oid, id).await? {
            return Err(AppError::NotFound("Bank account not found".to_string()));
        }

        Ok(())
    }

    pub async fn list_banks(&self) -> Result<Vec<Bank>, AppError> {
        PaystackService::instance().list_banks().await
    }

    /// Gross revenue is price times purchase count across the tutor's
    /// courses. The platform keeps its charge; what remains, minus what has
    /// already been withdrawn, is available.
    pub async fn earnings(&self, tutor_id: &str) -> Result<EarningsResponse, AppError> {
        let tutor_oid = ObjectId::parse_str(tutor_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let courses = self.course_repo.find_by_tutor(&tutor_oid).await?;
        let gross: f64 = courses
            .iter()
            .map(|c| c.price * c.purchase_count as f64)
            .sum();

        let platform_charge = gross * PaystackConfig::PLATFORM_CHARGE_RATE;
        let net = gross - platform_charge;
        let withdrawn = self.withdrawal_repo.total_withdrawn(&tutor_oid).await?;

        Ok(EarningsResponse {
            gross_earnings: gross,
            platform_charge,
            net_earnings: net,
            total_withdrawn: withdrawn,
            available_balance: net - withdrawn,
        })
    }

    /// Withdraws from the available balance. The requested amount is gross;
    /// the platform charge comes off before transfer.
    pub async fn withdraw(
        &self,
        tutor_id: &str,
        request: WithdrawalRequest,
    ) -> Result<WithdrawalResponse, AppError> {
        let tutor_oid = ObjectId::parse_str(tutor_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let bank_account = self
            .bankaccount_repo
            .find_by_id(&request.bank_account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Bank account not found".to_string()))?;

        if bank_account.tutor_id != tutor_oid || !bank_account.is_active {
            return Err(AppError::AuthorizationError(
                "This bank account does not belong to you".to_string(),
            ));
        }

        let net_amount = request.amount * (1.0 - PaystackConfig::PLATFORM_CHARGE_RATE);

        let earnings = self.earnings(tutor_id).await?;
        if net_amount > earnings.available_balance {
            return Err(AppError::ValidationError(
                "Insufficient available balance".to_string(),
            ));
        }

        let bank_account_oid = bank_account
            .id
            .ok_or_else(|| AppError::InternalError("Bank account has no id".to_string()))?;

        let paystack = PaystackService::instance();
        let recipient_code = paystack
            .create_transfer_recipient(
                &bank_account.account_name,
                &bank_account.account_number,
                &bank_account.bank_code,
            )
            .await?;

        let mut withdrawal = Withdrawal::new(tutor_oid, bank_account_oid, net_amount);
        let reference = format!("TRF_{}", uuid::Uuid::new_v4().simple());
        withdrawal.transfer_reference = Some(reference.clone());

        let created = self.withdrawal_repo.create(withdrawal).await?;

        // The transfer result arrives asynchronously through the webhook;
        // the record stays pending until then.
        paystack
            .initiate_transfer(net_amount, &recipient_code, &reference, "Tutor withdrawal")
            .await?;

        Ok(WithdrawalResponse::from(created))
    }

    pub async fn list_withdrawals(
        &self,
        tutor_id: &str,
    ) -> Result<Vec<WithdrawalResponse>, AppError> {
        let tutor_oid = ObjectId::parse_str(tutor_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let withdrawals = self.withdrawal_repo.find_by_tutor(&tutor_oid).await?;
        Ok(withdrawals
            .into_iter()
            .map(WithdrawalResponse::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::PaystackConfig;

    #[test]
    fn platform_keeps_ten_percent() {
        let gross = 10_000.0;
        let net = gross * (1.0 - PaystackConfig::PLATFORM_CHARGE_RATE);
        assert_eq!(net, 9_000.0);
    }
}
