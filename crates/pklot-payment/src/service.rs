//! # Payment Service
//!
//! Settles exit fees through one provider. The service never inspects the
//! concrete provider type; it asks for capabilities and reports
//! [`PaymentError::UnsupportedCapability`] when one is missing.

use pklot_core::{Amount, Currency};
use pklot_facility::Fee;
use uuid::Uuid;

use crate::capability::{Capability, ChargeRequest, PaymentProvider, PaymentReceipt};
use crate::error::{PaymentError, PaymentResult};
use crate::providers::ProviderSettings;
use crate::registry::ProviderRegistry;

pub struct PaymentService {
    provider: Box<dyn PaymentProvider>,
}

impl std::fmt::Debug for PaymentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentService")
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl PaymentService {
    pub fn new(provider: Box<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    /// Look up `name` in `registry` and wrap the new provider.
    pub fn from_registry(
        registry: &ProviderRegistry,
        name: &str,
        settings: &ProviderSettings,
    ) -> PaymentResult<Self> {
        registry.create(name, settings).map(Self::new)
    }

    pub fn provider(&self) -> &dyn PaymentProvider {
        self.provider.as_ref()
    }

    pub fn make_payment(&self, request: &ChargeRequest) -> PaymentResult<PaymentReceipt> {
        let result = self.provider.charge(request);
        match &result {
            Ok(receipt) => tracing::info!(
                provider = self.provider.name(),
                transaction = %receipt.transaction_id,
                amount = %receipt.amount,
                reference = %receipt.reference,
                "payment taken"
            ),
            Err(err) => tracing::warn!(
                provider = self.provider.name(),
                reference = %request.reference,
                error = %err,
                "payment failed"
            ),
        }
        result
    }

    /// Charge the vehicle's exit fee. The ticket id becomes the receipt
    /// reference and the vehicle id the payer.
    pub fn settle(&self, fee: &Fee, currency: &Currency) -> PaymentResult<PaymentReceipt> {
        self.make_payment(&ChargeRequest {
            amount: fee.amount,
            currency: currency.clone(),
            payer: fee.ticket.vehicle().id().to_string(),
            reference: fee.ticket.id().to_string(),
        })
    }

    /// # Errors
    ///
    /// [`PaymentError::UnsupportedCapability`] if the provider has no gift
    /// card support.
    pub fn pay_with_gift_card(
        &self,
        code: &str,
        amount: Amount,
        currency: &Currency,
        reference: &str,
    ) -> PaymentResult<PaymentReceipt> {
        let gift_cards = self
            .provider
            .as_gift_card()
            .ok_or_else(|| self.unsupported(Capability::GiftCard))?;
        let receipt = gift_cards.redeem_gift_card(code, amount, currency, reference)?;
        tracing::info!(
            provider = self.provider.name(),
            transaction = %receipt.transaction_id,
            amount = %receipt.amount,
            reference,
            "gift card payment taken"
        );
        Ok(receipt)
    }

    /// Pay the vehicle's exit fee from a gift card, referenced by ticket id.
    pub fn settle_with_gift_card(
        &self,
        fee: &Fee,
        code: &str,
        currency: &Currency,
    ) -> PaymentResult<PaymentReceipt> {
        self.pay_with_gift_card(code, fee.amount, currency, &fee.ticket.id().to_string())
    }

    /// # Errors
    ///
    /// [`PaymentError::UnsupportedCapability`] if the provider cannot refund.
    pub fn refund(&self, transaction_id: Uuid) -> PaymentResult<PaymentReceipt> {
        let refunds = self
            .provider
            .as_refundable()
            .ok_or_else(|| self.unsupported(Capability::Refund))?;
        let receipt = refunds.refund(transaction_id)?;
        tracing::info!(provider = self.provider.name(), transaction = %transaction_id, "payment refunded");
        Ok(receipt)
    }

    fn unsupported(&self, capability: Capability) -> PaymentError {
        PaymentError::UnsupportedCapability {
            provider: self.provider.name().to_string(),
            capability,
        }
    }
}
