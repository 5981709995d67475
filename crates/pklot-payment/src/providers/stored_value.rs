//! Stored-value terminal: card reader that also accepts prepaid gift cards.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use pklot_core::{Amount, Currency};
use uuid::Uuid;

use super::book::TransactionBook;
use super::ProviderSettings;
use crate::capability::{
    ChargeRequest, Chargeable, GiftCardCapable, PaymentProvider, PaymentReceipt, Refundable,
};
use crate::error::{PaymentError, PaymentResult};

/// Registry name of [`StoredValueTerminal`].
pub const STORED_VALUE: &str = "stored_value";

/// Charges, refunds and gift-card redemption.
///
/// Gift card balances come from [`ProviderSettings::gift_cards`]. A
/// redemption is recorded in the same transaction book as a charge, so it
/// can be looked up and refunded the same way (the refund does not credit
/// the card back).
#[derive(Debug)]
pub struct StoredValueTerminal {
    book: TransactionBook,
    gift_cards: Mutex<BTreeMap<String, Amount>>,
}

impl StoredValueTerminal {
    pub fn new(settings: &ProviderSettings) -> Self {
        Self {
            book: TransactionBook::new(STORED_VALUE, settings),
            gift_cards: Mutex::new(settings.gift_cards.clone()),
        }
    }
}

impl Chargeable for StoredValueTerminal {
    fn charge(&self, request: &ChargeRequest) -> PaymentResult<PaymentReceipt> {
        self.book.settle(request)
    }
}

impl Refundable for StoredValueTerminal {
    fn refund(&self, transaction_id: Uuid) -> PaymentResult<PaymentReceipt> {
        self.book.refund(transaction_id)
    }
}

impl GiftCardCapable for StoredValueTerminal {
    fn redeem_gift_card(
        &self,
        code: &str,
        amount: Amount,
        currency: &Currency,
        reference: &str,
    ) -> PaymentResult<PaymentReceipt> {
        self.book.check(amount, currency)?;

        let mut cards = self.gift_cards.lock();
        let balance = cards.get_mut(code).ok_or_else(|| PaymentError::GiftCard {
            code: code.to_string(),
            reason: "unknown code".to_string(),
        })?;
        let remaining = balance
            .checked_sub(amount)
            .ok_or_else(|| PaymentError::GiftCard {
                code: code.to_string(),
                reason: format!("insufficient balance: {balance} available, {amount} required"),
            })?;
        *balance = remaining;
        drop(cards);

        tracing::info!(code, amount = %amount, remaining = %remaining, "gift card redeemed");
        Ok(self.book.record(amount, code, reference))
    }

    fn gift_card_balance(&self, code: &str) -> PaymentResult<Amount> {
        self.gift_cards
            .lock()
            .get(code)
            .copied()
            .ok_or_else(|| PaymentError::GiftCard {
                code: code.to_string(),
                reason: "unknown code".to_string(),
            })
    }
}

impl PaymentProvider for StoredValueTerminal {
    fn name(&self) -> &str {
        STORED_VALUE
    }

    fn as_refundable(&self) -> Option<&dyn Refundable> {
        Some(self)
    }

    fn as_gift_card(&self) -> Option<&dyn GiftCardCapable> {
        Some(self)
    }
}
