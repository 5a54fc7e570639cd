//! # consign-types
//!
//! Shared types, errors, and configuration for the **Consign** marketplace
//! ledger.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`SlotId`], [`AssetId`], [`CallId`]
//! - **Price model**: [`PricePair`], [`AssetClass`], [`Amount`], [`Quantity`]
//! - **Inventory model**: [`InventorySlot`]
//! - **Configuration**: [`ShopConfig`], [`ShopInfo`]
//! - **Events**: [`ShopEvent`]
//! - **Errors**: [`ShopError`] with `SHOP_ERR_` prefix codes, [`ErrorKind`]
//! - **Constants**: the percentage scale and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod inventory;
pub mod price;

// Re-export all primary types at crate root for ergonomic imports:
//   use consign_types::{Address, PricePair, ShopError, ...};

pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use inventory::*;
pub use price::*;

// Constants are accessed via `consign_types::constants::FOO`
// (not re-exported to avoid name collisions).
