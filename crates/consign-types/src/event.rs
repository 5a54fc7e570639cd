//! Events recorded by successful shop operations.
//!
//! Events form the audit trail of the shop. A call that fails records no
//! event at all.

use serde::{Deserialize, Serialize};

use crate::{Address, Amount, AssetId, PricePair, Quantity, SlotId};

/// Something that happened to the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopEvent {
    /// A new inventory slot was created.
    ItemListed {
        slot: SlotId,
        asset_contract: Address,
        asset_id: AssetId,
        quantity: Quantity,
    },
    /// Stock was returned to the owner.
    ItemRemoved {
        slot: SlotId,
        quantity: Quantity,
        remaining: Quantity,
    },
    /// A slot's price list was replaced.
    PriceChanged {
        slot: SlotId,
        price_list: Vec<PricePair>,
    },
    /// Stock was sold.
    ItemPurchased {
        slot: SlotId,
        buyer: Address,
        quantity: Quantity,
        price_index: usize,
        pair: PricePair,
        total: Amount,
        fee: Amount,
        royalty: Amount,
        remainder: Amount,
        refund: Amount,
    },
    FeePercentChanged { old: u64, new: u64 },
    RoyaltyPercentChanged { old: u64, new: u64 },
    FeeOwnerChanged { old: Address, new: Address },
    RoyaltyOwnerChanged { old: Address, new: Address },
    OwnershipTransferred { old: Address, new: Address },
}

impl ShopEvent {
    /// Stable upper-case name, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ItemListed { .. } => "ITEM_LISTED",
            Self::ItemRemoved { .. } => "ITEM_REMOVED",
            Self::PriceChanged { .. } => "PRICE_CHANGED",
            Self::ItemPurchased { .. } => "ITEM_PURCHASED",
            Self::FeePercentChanged { .. } => "FEE_PERCENT_CHANGED",
            Self::RoyaltyPercentChanged { .. } => "ROYALTY_PERCENT_CHANGED",
            Self::FeeOwnerChanged { .. } => "FEE_OWNER_CHANGED",
            Self::RoyaltyOwnerChanged { .. } => "ROYALTY_OWNER_CHANGED",
            Self::OwnershipTransferred { .. } => "OWNERSHIP_TRANSFERRED",
        }
    }

    /// The slot this event concerns, if any.
    #[must_use]
    pub fn slot(&self) -> Option<SlotId> {
        match self {
            Self::ItemListed { slot, .. }
            | Self::ItemRemoved { slot, .. }
            | Self::PriceChanged { slot, .. }
            | Self::ItemPurchased { slot, .. } => Some(*slot),
            _ => None,
        }
    }
}

impl std::fmt::Display for ShopEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.slot() {
            Some(slot) => write!(f, "{} {slot}", self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}
