//! Inventory ledger: the append-only table of consigned stock.
//!
//! Slot ids come from a strictly increasing counter. Every id below
//! [`InventoryLedger::next_slot_id`] names a slot (possibly depleted); every
//! id at or above it is invalid. Slots are never deleted.

use consign_types::{
    Address, AssetId, InventorySlot, PricePair, Quantity, Result, ShopError, SlotId,
};

use crate::undo::{UndoMap, UndoMark};

/// A borrowed `listItems` request.
///
/// Group `g` pairs `asset_contracts[g]` with `id_groups[g]` and
/// `quantity_groups[g]` element-wise.
#[derive(Debug, Clone, Copy)]
pub struct Listing<'a> {
    pub price_list: &'a [PricePair],
    pub asset_contracts: &'a [Address],
    pub id_groups: &'a [Vec<AssetId>],
    pub quantity_groups: &'a [Vec<Quantity>],
}

impl Listing<'_> {
    /// Check every precondition, in order, without touching any state.
    ///
    /// # Errors
    /// The first violated precondition, as a validation error.
    pub fn validate(&self) -> Result<()> {
        if self.asset_contracts.is_empty() {
            return Err(ShopError::NoItemsListed);
        }
        if self.price_list.is_empty() {
            return Err(ShopError::EmptyPriceList);
        }
        if self.asset_contracts.len() != self.id_groups.len() {
            return Err(ShopError::IdGroupsMismatch {
                contracts: self.asset_contracts.len(),
                groups: self.id_groups.len(),
            });
        }
        if self.asset_contracts.len() != self.quantity_groups.len() {
            return Err(ShopError::QuantityGroupsMismatch {
                contracts: self.asset_contracts.len(),
                groups: self.quantity_groups.len(),
            });
        }
        for (group, (ids, quantities)) in self
            .id_groups
            .iter()
            .zip(self.quantity_groups)
            .enumerate()
        {
            if ids.is_empty() {
                return Err(ShopError::EmptyIdGroup { group });
            }
            if ids.len() != quantities.len() {
                return Err(ShopError::IdQuantityMismatch {
                    group,
                    ids: ids.len(),
                    quantities: quantities.len(),
                });
            }
            if let Some(index) = quantities.iter().position(|&q| q == 0) {
                return Err(ShopError::ZeroListingQuantity { group, index });
            }
        }
        Ok(())
    }

    /// Flatten the groups into `(contract, id, quantity)` triples, in order.
    pub fn entries(&self) -> impl Iterator<Item = (Address, AssetId, Quantity)> + '_ {
        self.asset_contracts
            .iter()
            .zip(self.id_groups.iter().zip(self.quantity_groups))
            .flat_map(|(&contract, (ids, quantities))| {
                ids.iter()
                    .zip(quantities)
                    .map(move |(&id, &quantity)| (contract, id, quantity))
            })
    }

    /// Number of slots this listing creates.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.id_groups.iter().map(Vec::len).sum()
    }
}

/// Ledger position captured by [`InventoryLedger::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryMark {
    next_slot_id: SlotId,
    slots: UndoMark,
}

/// Owns every inventory slot ever created.
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    /// Slot table keyed by id. Keys are exactly `0..next_slot_id`.
    slots: UndoMap<SlotId, InventorySlot>,
    /// The id the next appended slot will receive.
    next_slot_id: SlotId,
}

impl InventoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: UndoMap::new(),
            next_slot_id: SlotId(0),
        }
    }

    /// Append a new slot and return its id.
    pub fn append(&mut self, asset_contract: Address, asset_id: AssetId, quantity: Quantity) -> SlotId {
        let id = self.next_slot_id;
        self.slots
            .insert(id, InventorySlot::new(asset_contract, asset_id, quantity));
        self.next_slot_id = id.next();
        id
    }

    /// Total slots ever created, depleted ones included.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.next_slot_id.0
    }

    #[must_use]
    pub fn next_slot_id(&self) -> SlotId {
        self.next_slot_id
    }

    /// Look up a slot. `None` only for ids that were never created.
    #[must_use]
    pub fn slot(&self, id: SlotId) -> Option<&InventorySlot> {
        self.slots.get(&id)
    }

    /// Look up a slot, failing with `SlotNotFound` for invalid ids.
    pub fn get(&self, id: SlotId) -> Result<&InventorySlot> {
        self.slots.get(&id).ok_or(ShopError::SlotNotFound(id))
    }

    /// Remove `quantity` units from a slot. Returns the remaining stock.
    ///
    /// # Errors
    /// - `SlotNotFound` if the slot does not exist
    /// - `InsufficientStock` if `quantity` exceeds the stock
    pub fn withdraw(&mut self, id: SlotId, quantity: Quantity) -> Result<Quantity> {
        let mut slot = self.get(id)?.clone();
        if quantity > slot.quantity {
            return Err(ShopError::InsufficientStock {
                slot: id,
                requested: quantity,
                available: slot.quantity,
            });
        }
        slot.quantity -= quantity;
        let remaining = slot.quantity;
        self.slots.insert(id, slot);
        Ok(remaining)
    }

    /// Check that a sale of `quantity` units can be served.
    ///
    /// Zero and over-limit quantities fail identically.
    pub fn check_saleable(&self, id: SlotId, quantity: Quantity) -> Result<&InventorySlot> {
        let slot = self.get(id)?;
        if quantity == 0 || quantity > slot.quantity {
            return Err(ShopError::InsufficientStock {
                slot: id,
                requested: quantity,
                available: slot.quantity,
            });
        }
        Ok(slot)
    }

    /// Units of `(contract, id)` held across all slots.
    #[must_use]
    pub fn custody(&self, asset_contract: Address, asset_id: AssetId) -> Quantity {
        self.slots
            .values()
            .filter(|s| s.asset_contract == asset_contract && s.asset_id == asset_id)
            .map(|s| s.quantity)
            .sum()
    }

    /// Iterate all slots in id order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &InventorySlot)> {
        self.slots.iter().map(|(id, slot)| (*id, slot))
    }

    // ---- Checkpoint / rollback ----

    /// Start recording changes so they can be rolled back.
    pub fn checkpoint(&mut self) -> InventoryMark {
        InventoryMark {
            next_slot_id: self.next_slot_id,
            slots: self.slots.mark(),
        }
    }

    pub fn commit(&mut self, mark: InventoryMark) {
        self.slots.commit(mark.slots);
    }

    /// Drop slots appended and undo withdrawals made since `mark`.
    pub fn rollback(&mut self, mark: InventoryMark) {
        self.slots.rollback(mark.slots);
        self.next_slot_id = mark.next_slot_id;
    }

    /// Changes recorded since the outermost open checkpoint.
    #[must_use]
    pub fn pending_changes(&self) -> usize {
        self.slots.pending()
    }
}

impl Default for InventoryLedger {
    fn default() -> Self {
        Self::new()
    }
}
