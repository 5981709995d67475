//! # Provider Registry
//!
//! Maps provider names to constructor functions. Built once at startup with
//! [`ProviderRegistryBuilder`] and read-only afterwards; there is no global
//! registry.
//!
//! ```
//! use pklot_payment::{ProviderRegistry, ProviderSettings};
//!
//! let registry = ProviderRegistry::builtin();
//! let cash = registry.create("cash", &ProviderSettings::default()).unwrap();
//! assert_eq!(cash.name(), "cash");
//! assert!(registry.create("paypal", &ProviderSettings::default()).is_err());
//! ```

use std::collections::BTreeMap;

use crate::capability::PaymentProvider;
use crate::error::{PaymentError, PaymentResult};
use crate::providers::cash::CASH;
use crate::providers::stored_value::STORED_VALUE;
use crate::providers::{CashDesk, ProviderSettings, StoredValueTerminal};

/// Builds a provider from shared settings.
pub type ProviderConstructor = fn(&ProviderSettings) -> Box<dyn PaymentProvider>;

/// Immutable name → constructor table.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    constructors: BTreeMap<String, ProviderConstructor>,
}

/// Collects constructors before the registry is frozen.
#[derive(Default)]
pub struct ProviderRegistryBuilder {
    constructors: BTreeMap<String, ProviderConstructor>,
}

impl ProviderRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// [`PaymentError::DuplicateProvider`] if `name` is already taken.
    pub fn register(
        mut self,
        name: impl Into<String>,
        constructor: ProviderConstructor,
    ) -> PaymentResult<Self> {
        let name = name.into();
        if self.constructors.contains_key(&name) {
            return Err(PaymentError::DuplicateProvider(name));
        }
        self.constructors.insert(name, constructor);
        Ok(self)
    }

    pub fn build(self) -> ProviderRegistry {
        tracing::debug!(providers = self.constructors.len(), "provider registry built");
        ProviderRegistry {
            constructors: self.constructors,
        }
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.constructors.keys()).finish()
    }
}

impl std::fmt::Debug for ProviderRegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.constructors.keys()).finish()
    }
}

fn cash_desk(settings: &ProviderSettings) -> Box<dyn PaymentProvider> {
    Box::new(CashDesk::new(settings))
}

fn stored_value_terminal(settings: &ProviderSettings) -> Box<dyn PaymentProvider> {
    Box::new(StoredValueTerminal::new(settings))
}

impl ProviderRegistry {
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::new()
    }

    /// The offline providers shipped with this crate: `cash` and
    /// `stored_value`.
    pub fn builtin() -> Self {
        let mut constructors: BTreeMap<String, ProviderConstructor> = BTreeMap::new();
        constructors.insert(CASH.to_string(), cash_desk);
        constructors.insert(STORED_VALUE.to_string(), stored_value_terminal);
        Self { constructors }
    }

    /// Instantiate the provider registered under `name`.
    ///
    /// # Errors
    ///
    /// [`PaymentError::UnsupportedProvider`] for an unknown name.
    pub fn create(
        &self,
        name: &str,
        settings: &ProviderSettings,
    ) -> PaymentResult<Box<dyn PaymentProvider>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| PaymentError::UnsupportedProvider(name.to_string()))?;
        Ok(constructor(settings))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}
