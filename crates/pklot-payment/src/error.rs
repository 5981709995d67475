//! # Payment Errors

use pklot_core::{Amount, Currency};
use thiserror::Error;
use uuid::Uuid;

use crate::capability::Capability;

/// Errors arising from provider lookup and payment operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// No constructor is registered under this provider name.
    #[error("unsupported payment provider: {0}")]
    UnsupportedProvider(String),

    /// A constructor is already registered under this name.
    #[error("payment provider {0} is already registered")]
    DuplicateProvider(String),

    /// The provider exists but does not offer the requested capability.
    #[error("provider {provider} does not support {capability}")]
    UnsupportedCapability {
        provider: String,
        capability: Capability,
    },

    /// The provider refused the instruction.
    #[error("payment declined by {provider}: {reason}")]
    Declined { provider: String, reason: String },

    /// The transaction reference is not known to the provider.
    #[error("transaction {transaction} not found on {provider}")]
    UnknownTransaction { provider: String, transaction: Uuid },

    /// Gift card could not be redeemed (unknown code, short balance).
    #[error("gift card {code}: {reason}")]
    GiftCard { code: String, reason: String },

    /// Zero amounts are never charged.
    #[error("invalid payment amount {amount} {currency}")]
    InvalidAmount { amount: Amount, currency: Currency },
}

pub type PaymentResult<T> = Result<T, PaymentError>;
