//! In-memory implementation of every collaborator.
//!
//! [`InMemoryWorld`] stands in for the asset registry, the payment-token
//! ledger, and the native channel at once. It keeps an ordered log of every
//! transfer it executed and can report total supply per asset, which is
//! what the conservation checks in the tests compare against.
//!
//! Balances live in [`UndoMap`]s and the transfer log rolls back by
//! length, so reverting a call touches only what that call changed.

use consign_ledger::{UndoMap, UndoMark};
use consign_types::{Address, Amount, AssetId, Quantity, Result, ShopError};

use crate::rails::{AssetRegistry, NativeChannel, PaymentLedger};
use crate::transaction::Revertible;

/// One executed movement of value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    Asset {
        contract: Address,
        from: Address,
        to: Address,
        id: AssetId,
        quantity: Quantity,
    },
    Token {
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    },
    Native {
        from: Address,
        to: Address,
        amount: Amount,
    },
}

impl Transfer {
    #[must_use]
    pub fn to(&self) -> Address {
        match self {
            Self::Asset { to, .. } | Self::Token { to, .. } | Self::Native { to, .. } => *to,
        }
    }
}

/// Balances, approvals, and allowances of a whole simulated world.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorld {
    /// `(contract, holder, id)` → units held.
    assets: UndoMap<(Address, Address, AssetId), Quantity>,
    /// `(contract, owner, operator)` pairs with operator approval.
    approvals: UndoMap<(Address, Address, Address), ()>,
    /// `(token, holder)` → balance.
    tokens: UndoMap<(Address, Address), Amount>,
    /// `(token, owner, spender)` → remaining allowance.
    allowances: UndoMap<(Address, Address, Address), Amount>,
    /// account → native balance.
    native: UndoMap<Address, Amount>,
    log: Vec<Transfer>,
}

/// Marks into every table of an [`InMemoryWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldCheckpoint {
    assets: UndoMark,
    approvals: UndoMark,
    tokens: UndoMark,
    allowances: UndoMark,
    native: UndoMark,
    log_len: usize,
}

impl InMemoryWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Setup helpers ----

    /// Create `quantity` units of `id` out of thin air for `holder`.
    pub fn mint_asset(&mut self, contract: Address, holder: Address, id: AssetId, quantity: Quantity) {
        let key = (contract, holder, id);
        let held = self.assets.get(&key).copied().unwrap_or(0);
        self.assets.insert(key, held + quantity);
    }

    pub fn mint_token(&mut self, token: Address, holder: Address, amount: Amount) {
        let held = self.tokens.get(&(token, holder)).copied().unwrap_or(0);
        self.tokens.insert((token, holder), held + amount);
    }

    /// Set (not add to) the allowance `owner` grants `spender`.
    pub fn approve_token(&mut self, token: Address, owner: Address, spender: Address, amount: Amount) {
        self.allowances.insert((token, owner, spender), amount);
    }

    pub fn fund_native(&mut self, account: Address, amount: Amount) {
        let held = self.native.get(&account).copied().unwrap_or(0);
        self.native.insert(account, held + amount);
    }

    // ---- Inspection ----

    /// Every transfer executed so far, oldest first.
    #[must_use]
    pub fn transfers(&self) -> &[Transfer] {
        &self.log
    }

    /// Total units of `(contract, id)` across all holders.
    #[must_use]
    pub fn asset_supply(&self, contract: Address, id: AssetId) -> Quantity {
        self.assets
            .iter()
            .filter(|((c, _, i), _)| *c == contract && *i == id)
            .map(|(_, q)| *q)
            .sum()
    }

    /// Total balance of `token` across all holders.
    #[must_use]
    pub fn token_supply(&self, token: Address) -> Amount {
        self.tokens
            .iter()
            .filter(|((t, _), _)| *t == token)
            .map(|(_, a)| *a)
            .sum()
    }

    #[must_use]
    pub fn native_supply(&self) -> Amount {
        self.native.values().sum()
    }

    /// Balance writes remembered for rollback. Zero between calls.
    #[must_use]
    pub fn pending_changes(&self) -> usize {
        self.assets.pending()
            + self.approvals.pending()
            + self.tokens.pending()
            + self.allowances.pending()
            + self.native.pending()
    }
}

fn reject_null(to: Address, what: &str) -> Result<()> {
    if to.is_zero() {
        return Err(ShopError::ExternalRejected(format!(
            "{what} transfer to the null address"
        )));
    }
    Ok(())
}

fn credit<K: Ord + Clone>(map: &mut UndoMap<K, u128>, key: K, amount: u128) -> Result<()> {
    let held = map.get(&key).copied().unwrap_or(0);
    let total = held
        .checked_add(amount)
        .ok_or(ShopError::ArithmeticOverflow("collaborator balance"))?;
    map.insert(key, total);
    Ok(())
}

impl AssetRegistry for InMemoryWorld {
    fn asset_balance(&self, contract: Address, holder: Address, id: AssetId) -> Quantity {
        self.assets.get(&(contract, holder, id)).copied().unwrap_or(0)
    }

    fn is_approved_for_all(&self, contract: Address, owner: Address, operator: Address) -> bool {
        self.approvals.contains_key(&(contract, owner, operator))
    }

    fn set_approval_for_all(
        &mut self,
        contract: Address,
        owner: Address,
        operator: Address,
        approved: bool,
    ) -> Result<()> {
        if approved {
            self.approvals.insert((contract, owner, operator), ());
        } else {
            self.approvals.remove(&(contract, owner, operator));
        }
        Ok(())
    }

    fn transfer_asset(
        &mut self,
        contract: Address,
        operator: Address,
        from: Address,
        to: Address,
        id: AssetId,
        quantity: Quantity,
    ) -> Result<()> {
        reject_null(to, "asset")?;
        if operator != from && !self.is_approved_for_all(contract, from, operator) {
            return Err(ShopError::AssetNotApproved {
                contract,
                owner: from,
                operator,
            });
        }
        let available = self.asset_balance(contract, from, id);
        if available < quantity {
            return Err(ShopError::AssetBalanceTooLow {
                contract,
                id,
                holder: from,
                needed: quantity,
                available,
            });
        }
        self.assets.insert((contract, from, id), available - quantity);
        credit(&mut self.assets, (contract, to, id), quantity)?;
        tracing::debug!(%contract, %from, %to, %id, quantity, "asset transfer");
        self.log.push(Transfer::Asset {
            contract,
            from,
            to,
            id,
            quantity,
        });
        Ok(())
    }
}

impl PaymentLedger for InMemoryWorld {
    fn token_balance(&self, token: Address, holder: Address) -> Amount {
        self.tokens.get(&(token, holder)).copied().unwrap_or(0)
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(0)
    }

    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        reject_null(to, "token")?;
        let approved = self.allowance(token, from, spender);
        if approved < amount {
            return Err(ShopError::InsufficientAllowance {
                token,
                needed: amount,
                approved,
            });
        }
        let available = self.token_balance(token, from);
        if available < amount {
            return Err(ShopError::InsufficientTokenBalance {
                token,
                needed: amount,
                available,
            });
        }
        self.allowances
            .insert((token, from, spender), approved - amount);
        self.tokens.insert((token, from), available - amount);
        credit(&mut self.tokens, (token, to), amount)?;
        tracing::debug!(%token, %from, %to, amount, "token transfer");
        self.log.push(Transfer::Token {
            token,
            from,
            to,
            amount,
        });
        Ok(())
    }
}

impl NativeChannel for InMemoryWorld {
    fn native_balance(&self, account: Address) -> Amount {
        self.native.get(&account).copied().unwrap_or(0)
    }

    fn transfer_native(&mut self, from: Address, to: Address, amount: Amount) -> Result<()> {
        reject_null(to, "native")?;
        let available = self.native_balance(from);
        if available < amount {
            return Err(ShopError::InsufficientNativeBalance {
                account: from,
                needed: amount,
                available,
            });
        }
        self.native.insert(from, available - amount);
        credit(&mut self.native, to, amount)?;
        tracing::debug!(%from, %to, amount, "native transfer");
        self.log.push(Transfer::Native { from, to, amount });
        Ok(())
    }
}

impl Revertible for InMemoryWorld {
    type Checkpoint = WorldCheckpoint;

    fn checkpoint(&mut self) -> WorldCheckpoint {
        WorldCheckpoint {
            assets: self.assets.mark(),
            approvals: self.approvals.mark(),
            tokens: self.tokens.mark(),
            allowances: self.allowances.mark(),
            native: self.native.mark(),
            log_len: self.log.len(),
        }
    }

    fn commit(&mut self, checkpoint: WorldCheckpoint) {
        self.assets.commit(checkpoint.assets);
        self.approvals.commit(checkpoint.approvals);
        self.tokens.commit(checkpoint.tokens);
        self.allowances.commit(checkpoint.allowances);
        self.native.commit(checkpoint.native);
    }

    fn revert_to(&mut self, checkpoint: WorldCheckpoint) {
        self.assets.rollback(checkpoint.assets);
        self.approvals.rollback(checkpoint.approvals);
        self.tokens.rollback(checkpoint.tokens);
        self.allowances.rollback(checkpoint.allowances);
        self.native.rollback(checkpoint.native);
        self.log.truncate(checkpoint.log_len);
    }
}
