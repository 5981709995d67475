//! # Offline Providers
//!
//! In-memory providers that settle immediately. Neither talks to a network;
//! each keeps its own transaction book for refunds and auditing.
//!
//! | Provider | Name | Capabilities |
//! |----------|------|--------------|
//! | [`CashDesk`] | `cash` | charge, refund |
//! | [`StoredValueTerminal`] | `stored_value` | charge, refund, gift card |

mod book;
pub mod cash;
pub mod stored_value;

use std::collections::BTreeMap;

use pklot_core::{Amount, Currency};
use serde::{Deserialize, Serialize};

pub use cash::CashDesk;
pub use stored_value::StoredValueTerminal;

/// Settings handed to every provider constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// The only currency the provider accepts.
    pub currency: Currency,
    /// Charges above this amount are declined.
    #[serde(default)]
    pub charge_limit: Option<Amount>,
    /// Pre-issued gift cards and their balances, for providers that
    /// support them.
    #[serde(default)]
    pub gift_cards: BTreeMap<String, Amount>,
}

impl ProviderSettings {
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            charge_limit: None,
            gift_cards: BTreeMap::new(),
        }
    }

    pub fn with_charge_limit(mut self, limit: Amount) -> Self {
        self.charge_limit = Some(limit);
        self
    }

    pub fn with_gift_card(mut self, code: impl Into<String>, balance: Amount) -> Self {
        self.gift_cards.insert(code.into(), balance);
        self
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self::new(Currency::inr())
    }
}
