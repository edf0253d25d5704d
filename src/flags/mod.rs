//! Feature-flag provider integration.
//!
//! ## Architecture
//!
//! - `FlagProvider` - trait over a flag/analytics backend session
//! - `ProviderSlot` - optional provider handle with an explicit readiness signal
//! - `InMemoryFlagProvider` - in-process provider driven by a flag table
//! - `keys` - flag keys read by the experiment resolver

pub mod keys;
mod memory;
mod provider;
mod slot;

pub use memory::{CapturedEvent, InMemoryFlagProvider};
pub use provider::{FlagProvider, FlagValue, Properties, SharedProvider};
pub use slot::ProviderSlot;
