//! Transaction book shared by the offline providers.

use std::collections::HashMap;

use parking_lot::Mutex;
use pklot_core::{Amount, Currency};
use uuid::Uuid;

use super::ProviderSettings;
use crate::capability::{ChargeRequest, PaymentReceipt, PaymentStatus};
use crate::error::{PaymentError, PaymentResult};

#[derive(Debug)]
pub(super) struct TransactionBook {
    provider: &'static str,
    currency: Currency,
    charge_limit: Option<Amount>,
    entries: Mutex<HashMap<Uuid, PaymentReceipt>>,
}

impl TransactionBook {
    pub(super) fn new(provider: &'static str, settings: &ProviderSettings) -> Self {
        Self {
            provider,
            currency: settings.currency.clone(),
            charge_limit: settings.charge_limit,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Check amount and currency without recording anything.
    pub(super) fn check(&self, amount: Amount, currency: &Currency) -> PaymentResult<()> {
        if amount.is_zero() {
            return Err(PaymentError::InvalidAmount {
                amount,
                currency: currency.clone(),
            });
        }
        if *currency != self.currency {
            return Err(self.declined(format!(
                "currency {currency} not accepted, expected {}",
                self.currency
            )));
        }
        if let Some(limit) = self.charge_limit {
            if amount > limit {
                return Err(self.declined(format!("amount {amount} exceeds limit {limit}")));
            }
        }
        Ok(())
    }

    pub(super) fn settle(&self, request: &ChargeRequest) -> PaymentResult<PaymentReceipt> {
        self.check(request.amount, &request.currency)?;
        Ok(self.record(request.amount, &request.payer, &request.reference))
    }

    /// Record an already-validated settlement.
    pub(super) fn record(&self, amount: Amount, payer: &str, reference: &str) -> PaymentReceipt {
        let receipt = PaymentReceipt {
            transaction_id: Uuid::new_v4(),
            provider: self.provider.to_string(),
            amount,
            currency: self.currency.clone(),
            payer: payer.to_string(),
            reference: reference.to_string(),
            status: PaymentStatus::Settled,
        };
        self.entries
            .lock()
            .insert(receipt.transaction_id, receipt.clone());
        tracing::debug!(
            provider = self.provider,
            transaction = %receipt.transaction_id,
            amount = %amount,
            payer,
            reference,
            "payment settled"
        );
        receipt
    }

    pub(super) fn refund(&self, transaction_id: Uuid) -> PaymentResult<PaymentReceipt> {
        let mut entries = self.entries.lock();
        let entry = entries
            .get_mut(&transaction_id)
            .ok_or_else(|| PaymentError::UnknownTransaction {
                provider: self.provider.to_string(),
                transaction: transaction_id,
            })?;
        if entry.status == PaymentStatus::Refunded {
            return Err(self.declined(format!("transaction {transaction_id} already refunded")));
        }
        entry.status = PaymentStatus::Refunded;
        tracing::debug!(provider = self.provider, transaction = %transaction_id, "payment refunded");
        Ok(entry.clone())
    }

    pub(super) fn len(&self) -> usize {
        self.entries.lock().len()
    }

    fn declined(&self, reason: String) -> PaymentError {
        PaymentError::Declined {
            provider: self.provider.to_string(),
            reason,
        }
    }
}
