//! Price pairs: the payment methods a slot accepts.
//!
//! A slot's price list is an ordered sequence of [`PricePair`]s. Buyers pick
//! one by index when purchasing.

use serde::{Deserialize, Serialize};

use crate::Address;

/// Amount of a payment asset (native currency or fungible token), in base units.
pub type Amount = u128;

/// Units of an external ownership asset.
pub type Quantity = u128;

/// Which payment rail a price pair settles on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum AssetClass {
    /// Value attached to the call and pushed to recipients.
    Native,
    /// Fungible token pulled from the buyer by prior authorization.
    Fungible,
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => write!(f, "NATIVE"),
            Self::Fungible => write!(f, "FUNGIBLE"),
        }
    }
}

/// One accepted payment method for an inventory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PricePair {
    pub asset_class: AssetClass,
    /// Payment token contract. Always [`Address::ZERO`] for native pairs.
    pub payment_asset: Address,
    /// Price of one unit of the listed asset.
    pub unit_price: Amount,
}

impl PricePair {
    #[must_use]
    pub fn native(unit_price: Amount) -> Self {
        Self {
            asset_class: AssetClass::Native,
            payment_asset: Address::ZERO,
            unit_price,
        }
    }

    #[must_use]
    pub fn fungible(token: Address, unit_price: Amount) -> Self {
        Self {
            asset_class: AssetClass::Fungible,
            payment_asset: token,
            unit_price,
        }
    }

    /// Native pairs ignore whatever payment asset the caller passed in.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self.asset_class {
            AssetClass::Native => Self::native(self.unit_price),
            AssetClass::Fungible => self,
        }
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        self.asset_class == AssetClass::Native
    }
}

impl std::fmt::Display for PricePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.asset_class {
            AssetClass::Native => write!(f, "{} {}", self.unit_price, self.asset_class),
            AssetClass::Fungible => write!(
                f,
                "{} {}({})",
                self.unit_price, self.asset_class, self.payment_asset
            ),
        }
    }
}
