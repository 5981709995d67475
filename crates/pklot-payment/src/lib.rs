//! # pklot-payment — Exit Fee Settlement
//!
//! - **Capabilities** (`capability.rs`): [`Chargeable`], [`Refundable`] and
//!   [`GiftCardCapable`], bundled by [`PaymentProvider`].
//! - **Providers** (`providers/`): offline [`CashDesk`] and
//!   [`StoredValueTerminal`].
//! - **Registry** (`registry.rs`): name → constructor table built at startup.
//! - **Service** (`service.rs`): [`PaymentService`] charges fees, redeems
//!   gift cards and refunds, failing with
//!   [`PaymentError::UnsupportedCapability`] when the provider lacks one.

pub mod capability;
pub mod error;
pub mod providers;
pub mod registry;
pub mod service;

pub use capability::{
    Capability, ChargeRequest, Chargeable, GiftCardCapable, PaymentProvider, PaymentReceipt,
    PaymentStatus, Refundable,
};
pub use error::{PaymentError, PaymentResult};
pub use providers::{CashDesk, ProviderSettings, StoredValueTerminal};
pub use registry::{ProviderConstructor, ProviderRegistry, ProviderRegistryBuilder};
pub use service::PaymentService;
