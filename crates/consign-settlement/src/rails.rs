//! Interfaces of the external collaborators.
//!
//! The engine never owns the goods or the money it moves. It reaches them
//! through three trusted interfaces:
//!
//! - [`AssetRegistry`]: multi-token ownership registry holding the listed goods
//! - [`PaymentLedger`]: fungible payment tokens, pulled by prior authorization
//! - [`NativeChannel`]: the native currency, attached to calls and pushed out
//!
//! A [`Host`] bundles all three with checkpoint/revert support so a failed
//! call can be undone as a unit.

use consign_types::{Address, Amount, AssetId, Quantity, Result};

use crate::transaction::Revertible;

/// Multi-token ownership registry (one balance per `(contract, holder, id)`).
pub trait AssetRegistry {
    /// Units of `id` held by `holder` on `contract`.
    fn asset_balance(&self, contract: Address, holder: Address, id: AssetId) -> Quantity;

    /// Whether `operator` may move every asset `owner` holds on `contract`.
    fn is_approved_for_all(&self, contract: Address, owner: Address, operator: Address) -> bool;

    /// Authorize or revoke `operator` for all of `owner`'s assets on `contract`.
    fn set_approval_for_all(
        &mut self,
        contract: Address,
        owner: Address,
        operator: Address,
        approved: bool,
    ) -> Result<()>;

    /// Move `quantity` units of `id` from `from` to `to`, acting as `operator`.
    ///
    /// `operator` must be `from` or approved for all of `from`'s assets.
    fn transfer_asset(
        &mut self,
        contract: Address,
        operator: Address,
        from: Address,
        to: Address,
        id: AssetId,
        quantity: Quantity,
    ) -> Result<()>;
}

/// Fungible payment-token ledger (one balance per `(token, holder)`).
pub trait PaymentLedger {
    fn token_balance(&self, token: Address, holder: Address) -> Amount;

    /// How much `spender` may still pull from `owner`.
    fn allowance(&self, token: Address, owner: Address, spender: Address) -> Amount;

    /// Pull `amount` from `from` to `to` on behalf of `spender`, consuming allowance.
    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()>;
}

/// Native-currency channel.
pub trait NativeChannel {
    fn native_balance(&self, account: Address) -> Amount;

    /// Push `amount` from `from` to `to`.
    fn transfer_native(&mut self, from: Address, to: Address, amount: Amount) -> Result<()>;
}

/// Everything the shop needs from the outside world.
pub trait Host: AssetRegistry + PaymentLedger + NativeChannel + Revertible {}

impl<T> Host for T where T: AssetRegistry + PaymentLedger + NativeChannel + Revertible {}
