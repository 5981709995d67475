//! # Provider Capabilities
//!
//! A payment provider is a bundle of optional capabilities rather than a
//! point in a class hierarchy. Every provider can charge; refunds and gift
//! cards are opt-in. Callers ask for a capability with the `as_*`
//! accessors on [`PaymentProvider`] and get `None` when it is absent.
//!
//! All traits are object-safe and `Send + Sync` so providers can be held as
//! `Box<dyn PaymentProvider>` and shared across gate threads.

use pklot_core::{Amount, Currency};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PaymentResult;

/// The capabilities a provider can advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Charge,
    Refund,
    GiftCard,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Charge => "charge",
            Self::Refund => "refund",
            Self::GiftCard => "gift_card",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to take money from a payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRequest {
    /// Amount in minor units. Must be non-zero.
    pub amount: Amount,
    pub currency: Currency,
    /// Payer reference, e.g. a vehicle registration or card token.
    pub payer: String,
    /// Reference printed on the receipt, e.g. a ticket id.
    pub reference: String,
}

/// Lifecycle of a recorded transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Settled,
    Refunded,
}

/// What a provider hands back for every charge, refund or redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Provider-assigned transaction reference (UUID v4).
    pub transaction_id: Uuid,
    pub provider: String,
    pub amount: Amount,
    pub currency: Currency,
    /// Who paid: the charge request's payer, or the gift card code.
    pub payer: String,
    pub reference: String,
    pub status: PaymentStatus,
}

/// Takes payment.
pub trait Chargeable: Send + Sync {
    /// # Errors
    ///
    /// - [`PaymentError::InvalidAmount`](crate::PaymentError::InvalidAmount)
    ///   for a zero amount.
    /// - [`PaymentError::Declined`](crate::PaymentError::Declined) when the
    ///   provider refuses the charge.
    fn charge(&self, request: &ChargeRequest) -> PaymentResult<PaymentReceipt>;
}

/// Reverses a previous settled charge in full.
pub trait Refundable: Send + Sync {
    /// # Errors
    ///
    /// - [`PaymentError::UnknownTransaction`](crate::PaymentError::UnknownTransaction)
    ///   if the transaction was never recorded here.
    /// - [`PaymentError::Declined`](crate::PaymentError::Declined) if it was
    ///   already refunded.
    fn refund(&self, transaction_id: Uuid) -> PaymentResult<PaymentReceipt>;
}

/// Pays from a prepaid gift card balance.
pub trait GiftCardCapable: Send + Sync {
    /// Debit `amount` from the card identified by `code`. `reference` is
    /// printed on the receipt, e.g. a ticket id.
    ///
    /// # Errors
    ///
    /// [`PaymentError::GiftCard`](crate::PaymentError::GiftCard) for an
    /// unknown code or insufficient balance; the balance is unchanged.
    fn redeem_gift_card(
        &self,
        code: &str,
        amount: Amount,
        currency: &Currency,
        reference: &str,
    ) -> PaymentResult<PaymentReceipt>;

    /// Remaining balance on a card.
    fn gift_card_balance(&self, code: &str) -> PaymentResult<Amount>;
}

/// A named payment provider with a charge capability and optional extras.
pub trait PaymentProvider: Chargeable {
    /// Registry name, e.g. `"cash"`.
    fn name(&self) -> &str;

    fn as_refundable(&self) -> Option<&dyn Refundable> {
        None
    }

    fn as_gift_card(&self) -> Option<&dyn GiftCardCapable> {
        None
    }

    /// Advertised capabilities, in a stable order.
    fn capabilities(&self) -> Vec<Capability> {
        let mut caps = vec![Capability::Charge];
        if self.as_refundable().is_some() {
            caps.push(Capability::Refund);
        }
        if self.as_gift_card().is_some() {
            caps.push(Capability::GiftCard);
        }
        caps
    }

    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Charge => true,
            Capability::Refund => self.as_refundable().is_some(),
            Capability::GiftCard => self.as_gift_card().is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ChargeOnly;

    impl Chargeable for ChargeOnly {
        fn charge(&self, request: &ChargeRequest) -> PaymentResult<PaymentReceipt> {
            Ok(PaymentReceipt {
                transaction_id: Uuid::nil(),
                provider: "charge_only".into(),
                amount: request.amount,
                currency: request.currency.clone(),
                payer: request.payer.clone(),
                reference: request.reference.clone(),
                status: PaymentStatus::Settled,
            })
        }
    }

    impl PaymentProvider for ChargeOnly {
        fn name(&self) -> &str {
            "charge_only"
        }
    }

    #[test]
    fn test_default_capabilities_are_charge_only() {
        let provider: Box<dyn PaymentProvider> = Box::new(ChargeOnly);
        assert_eq!(provider.capabilities(), vec![Capability::Charge]);
        assert!(provider.supports(Capability::Charge));
        assert!(!provider.supports(Capability::Refund));
        assert!(provider.as_gift_card().is_none());
    }

    #[test]
    fn test_capability_serde_names() {
        assert_eq!(
            serde_json::to_string(&Capability::GiftCard).unwrap(),
            "\"gift_card\""
        );
        assert_eq!(Capability::Refund.to_string(), "refund");
    }
}
