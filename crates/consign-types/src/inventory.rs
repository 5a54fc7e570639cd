//! Inventory slot records.

use serde::{Deserialize, Serialize};

use crate::{Address, AssetId, Quantity};

/// A quantity of one externally-owned asset held in custody for sale.
///
/// Slots are never deleted. A depleted slot (`quantity == 0`) stays
/// addressable together with its price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySlot {
    /// Ownership-asset registry holding the goods.
    pub asset_contract: Address,
    /// Token id inside that registry.
    pub asset_id: AssetId,
    /// Units remaining for sale.
    pub quantity: Quantity,
}

impl InventorySlot {
    #[must_use]
    pub fn new(asset_contract: Address, asset_id: AssetId, quantity: Quantity) -> Self {
        Self {
            asset_contract,
            asset_id,
            quantity,
        }
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.quantity == 0
    }
}

impl std::fmt::Display for InventorySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{} x{}",
            self.asset_contract, self.asset_id, self.quantity
        )
    }
}
