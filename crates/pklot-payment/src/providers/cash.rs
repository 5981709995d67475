//! Cash desk: an attendant takes cash at the exit barrier.

use uuid::Uuid;

use super::book::TransactionBook;
use super::ProviderSettings;
use crate::capability::{ChargeRequest, Chargeable, PaymentProvider, PaymentReceipt, Refundable};
use crate::error::PaymentResult;

/// Registry name of [`CashDesk`].
pub const CASH: &str = "cash";

/// Charges and refunds in cash. No gift cards.
#[derive(Debug)]
pub struct CashDesk {
    book: TransactionBook,
}

impl CashDesk {
    pub fn new(settings: &ProviderSettings) -> Self {
        Self {
            book: TransactionBook::new(CASH, settings),
        }
    }

    /// Number of transactions recorded so far.
    pub fn transaction_count(&self) -> usize {
        self.book.len()
    }
}

impl Chargeable for CashDesk {
    fn charge(&self, request: &ChargeRequest) -> PaymentResult<PaymentReceipt> {
        self.book.settle(request)
    }
}

impl Refundable for CashDesk {
    fn refund(&self, transaction_id: Uuid) -> PaymentResult<PaymentReceipt> {
        self.book.refund(transaction_id)
    }
}

impl PaymentProvider for CashDesk {
    fn name(&self) -> &str {
        CASH
    }

    fn as_refundable(&self) -> Option<&dyn Refundable> {
        Some(self)
    }
}
