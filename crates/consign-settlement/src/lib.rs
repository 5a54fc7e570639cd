//! # consign-settlement
//!
//! **Settlement plane**: the public surface of the shop and everything that
//! touches an external collaborator.
//!
//! ## Architecture
//!
//! A [`Shop`] owns the ledger state from `consign-ledger` and drives three
//! collaborator interfaces ([`AssetRegistry`], [`PaymentLedger`],
//! [`NativeChannel`]) through a single [`Host`]. For a purchase it:
//! 1. Validates slot, quantity, and price index
//! 2. Splits the total into fee, royalty, and seller remainder
//! 3. Decrements stock before any external transfer
//! 4. Pays the three recipients on the chosen rail
//! 5. Delivers the asset to the buyer
//!
//! ## Atomicity
//!
//! Every public call is wrapped in [`atomically`]: shop state and host are
//! checkpointed together and reverted together on failure.
//!
//! [`InMemoryWorld`] implements every collaborator in memory.

pub mod purchase;
pub mod rails;
pub mod shop;
pub mod split;
pub mod transaction;
pub mod world;

pub use purchase::PurchaseReceipt;
pub use rails::{AssetRegistry, Host, NativeChannel, PaymentLedger};
pub use shop::{CallContext, Shop};
pub use split::{FeeSchedule, Split, scaled_cut};
pub use transaction::{Revertible, atomically};
pub use world::{InMemoryWorld, Transfer, WorldCheckpoint};
