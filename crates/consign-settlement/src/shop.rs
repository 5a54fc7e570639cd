//! The shop: every public operation, behind one atomic call boundary.
//!
//! Each operation runs through `Shop::execute`, which
//! 1. checks the caller against [`AccessControl`] for administrative entries
//! 2. rejects attached value on non-payable operations
//! 3. moves attached value from the caller into engine custody
//! 4. runs the operation body
//! 5. on any error, reverts both the shop state and the collaborator world
//!
//! A stranger calling an administrative operation with value attached is
//! therefore told `NotOwner`, not `NotPayable`.

use consign_ledger::{
    AccessControl, EventJournal, InventoryLedger, InventoryMark, Listing, PriceBook, PriceList,
    UndoMark,
};
use consign_types::{
    Address, Amount, AssetId, CallId, InventorySlot, PricePair, Quantity, Result, ShopConfig,
    ShopError, ShopEvent, ShopInfo, SlotId,
};

use crate::rails::Host;
use crate::split::FeeSchedule;
use crate::transaction::{Revertible, atomically};

/// Who is calling, and how much native value they attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub value: Amount,
}

impl CallContext {
    /// A call with nothing attached.
    #[must_use]
    pub fn new(caller: Address) -> Self {
        Self { caller, value: 0 }
    }

    #[must_use]
    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }
}

/// Per-call facts visible to an operation body.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Call {
    pub(crate) id: CallId,
    pub(crate) caller: Address,
    pub(crate) value: Amount,
    /// The engine's own address: custodian of listed stock and attached value.
    pub(crate) shop: Address,
}

/// How an operation is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Entry {
    /// Owner only, no value.
    Admin,
    /// Anyone, value moves into custody.
    Payable,
}

/// Everything the shop owns.
#[derive(Debug, Clone)]
pub(crate) struct ShopState {
    pub(crate) name: String,
    pub(crate) version: String,
    pub(crate) fees: FeeSchedule,
    pub(crate) access: AccessControl,
    pub(crate) inventory: InventoryLedger,
    pub(crate) prices: PriceBook,
    pub(crate) journal: EventJournal,
}

/// Fee schedule and owner are a few words and are copied whole. The ledger
/// and price book keep undo logs; the journal only grows.
#[derive(Debug)]
pub(crate) struct ShopCheckpoint {
    fees: FeeSchedule,
    access: AccessControl,
    inventory: InventoryMark,
    prices: UndoMark,
    journal_len: usize,
}

impl Revertible for ShopState {
    type Checkpoint = ShopCheckpoint;

    fn checkpoint(&mut self) -> ShopCheckpoint {
        ShopCheckpoint {
            fees: self.fees.clone(),
            access: self.access.clone(),
            inventory: self.inventory.checkpoint(),
            prices: self.prices.checkpoint(),
            journal_len: self.journal.len(),
        }
    }

    fn commit(&mut self, checkpoint: ShopCheckpoint) {
        self.inventory.commit(checkpoint.inventory);
        self.prices.commit(checkpoint.prices);
    }

    fn revert_to(&mut self, checkpoint: ShopCheckpoint) {
        self.fees = checkpoint.fees;
        self.access = checkpoint.access;
        self.inventory.rollback(checkpoint.inventory);
        self.prices.rollback(checkpoint.prices);
        self.journal.rollback_to(checkpoint.journal_len);
    }
}

/// A consignment shop with its own address in the collaborator world.
#[derive(Debug, Clone)]
pub struct Shop {
    address: Address,
    state: ShopState,
}

impl Shop {
    /// Open a shop at `address` with an empty ledger.
    ///
    /// # Errors
    /// Any [`ShopConfig::validate`] failure, or `Configuration` for a null
    /// shop address.
    pub fn new(address: Address, config: ShopConfig) -> Result<Self> {
        if address.is_zero() {
            return Err(ShopError::Configuration(
                "shop address must not be null".into(),
            ));
        }
        config.validate()?;
        let access = AccessControl::new(config.owner)?;
        tracing::info!(
            shop = %address,
            name = %config.name,
            owner = %config.owner,
            fee_percent = config.fee_percent,
            royalty_percent = config.royalty_percent,
            "shop opened"
        );
        Ok(Self {
            address,
            state: ShopState {
                name: config.name,
                version: config.version,
                fees: FeeSchedule {
                    fee_owner: config.fee_owner,
                    fee_percent: config.fee_percent,
                    royalty_owner: config.royalty_owner,
                    royalty_percent: config.royalty_percent,
                },
                access,
                inventory: InventoryLedger::new(),
                prices: PriceBook::new(),
                journal: EventJournal::new(),
            },
        })
    }

    /// Run one public call atomically.
    pub(crate) fn execute<H, T, F>(
        &mut self,
        host: &mut H,
        ctx: CallContext,
        operation: &'static str,
        entry: Entry,
        body: F,
    ) -> Result<T>
    where
        H: Host,
        F: FnOnce(&mut ShopState, &mut H, &Call) -> Result<T>,
    {
        let call = Call {
            id: CallId::new(),
            caller: ctx.caller,
            value: ctx.value,
            shop: self.address,
        };
        let result = atomically(&mut self.state, host, |state, host| {
            if entry == Entry::Admin {
                }
            if call.value > 0 {
                if entry != Entry::Payable {
                    return Err(ShopError::NotPayable {
                        operation,
                        value: call.value,
                    });
                }
                host.transfer_native(call.caller, call.shop, call.value)?;
            }
            body(state, host, &call)
        });
        match &result {
            Ok(_) => tracing::info!(call_id = %call.id, operation, caller = %call.caller, "call committed"),
            Err(err) => tracing::warn!(
                call_id = %call.id,
                operation,
                caller = %call.caller,
                code = %err.code(),
                error = %err,
                "call rolled back"
            ),
        }
        result
    }

    // ========================================================================
    // Inventory
    // ========================================================================

    /// Consign stock: one new slot per `(contract, id, quantity)` triple,
    /// each starting with its own copy of `price_list`.
    ///
    /// The caller must have approved the shop as operator on every
    /// `asset_contracts[g]`.
    ///
    /// # Errors
    /// `NotOwner`, any [`Listing::validate`] failure, or a collaborator
    /// rejection of the asset pull.
    pub fn list_items<H: Host>(
        &mut self,
        host: &mut H,
        ctx: CallContext,
        price_list: &[PricePair],
        asset_contracts: &[Address],
        id_groups: &[Vec<AssetId>],
        quantity_groups: &[Vec<Quantity>],
    ) -> Result<Vec<SlotId>> {
        let listing = Listing {
            price_list,
            asset_contracts,
            id_groups,
            quantity_groups,
        };
        self.execute(host, ctx, "listItems", Entry::Admin, |state, host, call| {
            listing.validate()?;

            let mut created = Vec::with_capacity(listing.slot_count());
            for (contract, id, quantity) in listing.entries() {
                let slot = state.inventory.append(contract, id, quantity);
                state.prices.attach(slot, listing.price_list)?;
                host.transfer_asset(contract, call.shop, call.caller, call.shop, id, quantity)?;
                state.journal.record(
                    call.id,
                    ShopEvent::ItemListed {
                        slot,
                        asset_contract: contract,
                        asset_id: id,
                        quantity,
                    },
                )?;
                created.push(slot);
            }
            tracing::info!(
                call_id = %call.id,
                slots = created.len(),
                first = ?created.first(),
                next_slot = %state.inventory.next_slot_id(),
                "items listed"
            );
            Ok(created)
        })
    }

    /// Return `quantity` units of a slot to the owner.
    ///
    /// A zero quantity succeeds without moving anything.
    ///
    /// # Errors
    /// `NotOwner`, `SlotNotFound`, or `InsufficientStock`.
    pub fn remove_item<H: Host>(
        &mut self,
        host: &mut H,
        ctx: CallContext,
        slot: SlotId,
        quantity: Quantity,
    ) -> Result<()> {
        self.execute(host, ctx, "removeItem", Entry::Admin, |state, host, call| {
            let item = state.inventory.get(slot)?.clone();
            let remaining = state.inventory.withdraw(slot, quantity)?;
            if quantity > 0 {
                let owner = state.access.owner();
                host.transfer_asset(
                    item.asset_contract,
                    call.shop,
                    call.shop,
                    owner,
                    item.asset_id,
                    quantity,
                )?;
            }
            state.journal.record(
                call.id,
                ShopEvent::ItemRemoved {
                    slot,
                    quantity,
                    remaining,
                },
            )?;
            tracing::info!(call_id = %call.id, %slot, quantity, remaining, "item removed");
            Ok(())
        })
    }

    // ========================================================================
    // Prices
    // ========================================================================

    /// Replace a slot's price list.
    ///
    /// # Errors
    /// `NotOwner`, `EmptyPriceList`, or `SlotNotFound`.
    pub fn change_item_price<H: Host>(
        &mut self,
        host: &mut H,
        ctx: CallContext,
        slot: SlotId,
        price_list: &[PricePair],
    ) -> Result<()> {
        self.execute(host, ctx, "changeItemPrice", Entry::Admin, |state, _host, call| {
            let old_len = state.prices.replace(slot, price_list)?;
            let price_list = state
                .prices
                .list(slot)
                .map(PriceList::pairs)
                .unwrap_or_default();
            tracing::info!(
                call_id = %call.id,
                %slot,
                old_len,
                new_len = price_list.len(),
                "price list replaced"
            );
            state
                .journal
                .record(call.id, ShopEvent::PriceChanged { slot, price_list })?;
            Ok(())
        })
    }

    // ========================================================================
    // Fee schedule and ownership
    // ========================================================================

    /// # Errors
    /// `NotOwner` or `InvalidFeePercent`.
    pub fn change_fee_percent<H: Host>(&mut self, host: &mut H, ctx: CallContext, percent: u64) -> Result<()> {
        self.execute(host, ctx, "changeFeePercent", Entry::Admin, |state, _host, call| {
            let old = state.fees.set_fee_percent(percent)?;
            tracing::info!(call_id = %call.id, old, new = percent, "fee percent changed");
            state
                .journal
                .record(call.id, ShopEvent::FeePercentChanged { old, new: percent })?;
            Ok(())
        })
    }

    /// # Errors
    /// `NotOwner` or `InvalidRoyaltyPercent`.
    pub fn change_royalty_percent<H: Host>(&mut self, host: &mut H, ctx: CallContext, percent: u64) -> Result<()> {
        self.execute(host, ctx, "changeRoyaltyPercent", Entry::Admin, |state, _host, call| {
            let old = state.fees.set_royalty_percent(percent)?;
            tracing::info!(call_id = %call.id, old, new = percent, "royalty percent changed");
            state
                .journal
                .record(call.id, ShopEvent::RoyaltyPercentChanged { old, new: percent })?;
            Ok(())
        })
    }

    /// # Errors
    /// `NotOwner` or `NullFeeOwner`.
    pub fn change_fee_owner<H: Host>(&mut self, host: &mut H, ctx: CallContext, owner: Address) -> Result<()> {
        self.execute(host, ctx, "changeFeeOwner", Entry::Admin, |state, _host, call| {
            let old = state.fees.set_fee_owner(owner)?;
            tracing::info!(call_id = %call.id, %old, new = %owner, "fee owner changed");
            state
                .journal
                .record(call.id, ShopEvent::FeeOwnerChanged { old, new: owner })?;
            Ok(())
        })
    }

    /// # Errors
    /// `NotOwner` or `NullRoyaltyOwner`.
    pub fn change_royalty_owner<H: Host>(&mut self, host: &mut H, ctx: CallContext, owner: Address) -> Result<()> {
        self.execute(host, ctx, "changeRoyaltyOwner", Entry::Admin, |state, _host, call| {
            let old = state.fees.set_royalty_owner(owner)?;
            tracing::info!(call_id = %call.id, %old, new = %owner, "royalty owner changed");
            state
                .journal
                .record(call.id, ShopEvent::RoyaltyOwnerChanged { old, new: owner })?;
            Ok(())
        })
    }

    /// Hand the administrative role to `new_owner`.
    ///
    /// # Errors
    /// `NotOwner` or `NullOwner`.
    pub fn transfer_ownership<H: Host>(&mut self, host: &mut H, ctx: CallContext, new_owner: Address) -> Result<()> {
        self.execute(host, ctx, "transferOwnership", Entry::Admin, |state, _host, call| {
            let old = state.access.transfer(new_owner)?;
            tracing::info!(call_id = %call.id, %old, new = %new_owner, "ownership transferred");
            state.journal.record(
                call.id,
                ShopEvent::OwnershipTransferred {
                    old,
                    new: new_owner,
                },
            )?;
            Ok(())
        })
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Total slots ever created, depleted ones included.
    #[must_use]
    pub fn get_inventory_count(&self) -> u64 {
        self.state.inventory.count()
    }

    /// A slot and its live price list.
    ///
    /// # Errors
    /// `SlotNotFound` for a slot that was never created.
    pub fn get_inventory_item(&self, slot: SlotId) -> Result<(InventorySlot, Vec<PricePair>)> {
        let item = self.state.inventory.get(slot)?.clone();
        let prices = self
            .state
            .prices
            .list(slot)
            .ok_or(ShopError::SlotNotFound(slot))?
            .pairs();
        Ok((item, prices))
    }

    #[must_use]
    pub fn get_shop_info(&self) -> ShopInfo {
        let fees = &self.state.fees;
        ShopInfo {
            name: self.state.name.clone(),
            fee_owner: fees.fee_owner,
            fee_percent: fees.fee_percent,
            royalty_owner: fees.royalty_owner,
            royalty_percent: fees.royalty_percent,
            version: self.state.version.clone(),
        }
    }

    /// Current settings as a config that would reopen an identical shop.
    #[must_use]
    pub fn config(&self) -> ShopConfig {
        let fees = &self.state.fees;
        ShopConfig {
            name: self.state.name.clone(),
            owner: self.state.access.owner(),
            fee_owner: fees.fee_owner,
            fee_percent: fees.fee_percent,
            royalty_owner: fees.royalty_owner,
            royalty_percent: fees.royalty_percent,
            version: self.state.version.clone(),
        }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.state.name
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.state.access.owner()
    }

    #[must_use]
    pub fn fee_owner(&self) -> Address {
        self.state.fees.fee_owner
    }

    #[must_use]
    pub fn fee_percent(&self) -> u64 {
        self.state.fees.fee_percent
    }

    #[must_use]
    pub fn royalty_owner(&self) -> Address {
        self.state.fees.royalty_owner
    }

    #[must_use]
    pub fn royalty_percent(&self) -> u64 {
        self.state.fees.royalty_percent
    }

    #[must_use]
    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.state.fees
    }

    /// Recorded length of a slot's price list, `None` for unknown slots.
    #[must_use]
    pub fn price_pair_length(&self, slot: SlotId) -> Option<usize> {
        self.state.prices.len_of(slot)
    }

    /// One price pair, `None` past the recorded length or for unknown slots.
    #[must_use]
    pub fn price_pair(&self, slot: SlotId, index: usize) -> Option<PricePair> {
        self.state.prices.pair(slot, index)
    }

    /// The raw price list of a slot, cleared entries included.
    #[must_use]
    pub fn price_list(&self, slot: SlotId) -> Option<&PriceList> {
        self.state.prices.list(slot)
    }

    #[must_use]
    pub fn inventory_slot(&self, slot: SlotId) -> Option<InventorySlot> {
        self.state.inventory.slot(slot).cloned()
    }

    /// Units of `(contract, id)` the ledger says the shop holds.
    #[must_use]
    pub fn custody(&self, asset_contract: Address, asset_id: AssetId) -> Quantity {
        self.state.inventory.custody(asset_contract, asset_id)
    }

    #[must_use]
    pub fn journal(&self) -> &EventJournal {
        &self.state.journal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rails::{AssetRegistry, NativeChannel};
    use crate::world::InMemoryWorld;
    use consign_types::ErrorKind;

    const SHOP: u64 = 100;
    const OWNER: u64 = 1;
    const FEE: u64 = 2;
    const ROYALTY: u64 = 3;
    const STRANGER: u64 = 9;
    const NFT: u64 = 50;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    fn owner() -> CallContext {
        CallContext::new(addr(OWNER))
    }

    fn setup() -> (Shop, InMemoryWorld) {
        let config = ShopConfig::new("Armory", addr(OWNER), addr(FEE), addr(ROYALTY));
        let shop = Shop::new(addr(SHOP), config).unwrap();
        let mut world = InMemoryWorld::new();
        world.mint_asset(addr(NFT), addr(OWNER), AssetId(1), 20);
        world.mint_asset(addr(NFT), addr(OWNER), AssetId(2), 5);
        world
            .set_approval_for_all(addr(NFT), addr(OWNER), addr(SHOP), true)
            .unwrap();
        (shop, world)
    }

    fn list_two(shop: &mut Shop, world: &mut InMemoryWorld) -> Vec<SlotId> {
        shop.list_items(
            world,
            owner(),
            &[PricePair::native(10)],
            &[addr(NFT)],
            &[vec![AssetId(1), AssetId(2)]],
            &[vec![15, 5]],
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_bad_config() {
        let config = ShopConfig::new("x", Address::ZERO, addr(FEE), addr(ROYALTY));
        assert_eq!(
            Shop::new(addr(SHOP), config).unwrap_err(),
            ShopError::NullOwner
        );
        let config = ShopConfig::new("x", addr(OWNER), addr(FEE), addr(ROYALTY))
            .with_percents(50_000, 50_000);
        assert!(matches!(
            Shop::new(addr(SHOP), config),
            Err(ShopError::InvalidFeePercent { .. })
        ));
        let config = ShopConfig::new("x", addr(OWNER), addr(FEE), addr(ROYALTY));
        assert!(matches!(
            Shop::new(Address::ZERO, config),
            Err(ShopError::Configuration(_))
        ));
    }

    #[test]
    fn listing_moves_stock_into_custody() {
        let (mut shop, mut world) = setup();
        let slots = list_two(&mut shop, &mut world);
        assert_eq!(slots, vec![SlotId(0), SlotId(1)]);
        assert_eq!(shop.get_inventory_count(), 2);
        assert_eq!(world.asset_balance(addr(NFT), addr(SHOP), AssetId(1)), 15);
        assert_eq!(world.asset_balance(addr(NFT), addr(OWNER), AssetId(1)), 5);
        assert_eq!(shop.custody(addr(NFT), AssetId(1)), 15);
        assert_eq!(shop.journal().len(), 2);
    }

    #[test]
    fn listing_validation_touches_nothing() {
        let (mut shop, mut world) = setup();
        let err = shop
            .list_items(
                &mut world,
                owner(),
                &[PricePair::native(10)],
                &[addr(NFT)],
                &[vec![AssetId(1), AssetId(2)]],
                &[vec![15, 0]],
            )
            .unwrap_err();
        assert_eq!(err, ShopError::ZeroListingQuantity { group: 0, index: 1 });
        assert_eq!(shop.get_inventory_count(), 0);
        assert!(world.transfers().is_empty());
        assert!(shop.journal().is_empty());
    }

    #[test]
    fn listing_without_approval_rolls_back() {
        let (mut shop, mut world) = setup();
        world
            .set_approval_for_all(addr(NFT), addr(OWNER), addr(SHOP), false)
            .unwrap();
        let err = shop
            .list_items(
                &mut world,
                owner(),
                &[PricePair::native(10)],
                &[addr(NFT)],
                &[vec![AssetId(1), AssetId(2)]],
                &[vec![15, 5]],
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::External);
        assert_eq!(shop.get_inventory_count(), 0);
        assert!(shop.price_pair_length(SlotId(0)).is_none());
        assert!(shop.journal().is_empty());
        assert_eq!(world.asset_balance(addr(NFT), addr(OWNER), AssetId(1)), 20);
    }

    #[test]
    fn second_contract_unapproved_undoes_first_group() {
        const NFT2: u64 = 51;
        let (mut shop, mut world) = setup();
        world.mint_asset(addr(NFT2), addr(OWNER), AssetId(7), 3);

        let err = shop
            .list_items(
                &mut world,
                owner(),
                &[PricePair::native(10)],
                &[addr(NFT), addr(NFT2)],
                &[vec![AssetId(1)], vec![AssetId(7)]],
                &[vec![4], vec![3]],
            )
            .unwrap_err();
        assert!(matches!(err, ShopError::AssetNotApproved { .. }));
        assert_eq!(err.kind(), ErrorKind::External);

        assert_eq!(shop.get_inventory_count(), 0);
        assert!(shop.inventory_slot(SlotId(0)).is_none());
        assert!(shop.price_pair_length(SlotId(0)).is_none());
        assert!(shop.journal().is_empty());
        assert_eq!(shop.custody(addr(NFT), AssetId(1)), 0);
        assert_eq!(world.asset_balance(addr(NFT), addr(OWNER), AssetId(1)), 20);
        assert_eq!(world.asset_balance(addr(NFT), addr(SHOP), AssetId(1)), 0);
        assert_eq!(world.asset_balance(addr(NFT2), addr(OWNER), AssetId(7)), 3);
        assert!(world.transfers().is_empty());

        // The next listing starts from slot 0 again.
        assert_eq!(list_two(&mut shop, &mut world), vec![SlotId(0), SlotId(1)]);
    }

    #[test]
    fn long_history_keeps_no_undo_log() {
        let (mut shop, mut world) = setup();
        world.mint_asset(addr(NFT), addr(OWNER), AssetId(3), 200);
        for _ in 0..200 {
            shop.list_items(
                &mut world,
                owner(),
                &[PricePair::native(1)],
                &[addr(NFT)],
                &[vec![AssetId(3)]],
                &[vec![1]],
            )
            .unwrap();
        }
        assert_eq!(shop.get_inventory_count(), 200);
        assert_eq!(shop.state.inventory.pending_changes(), 0);
        assert_eq!(shop.state.prices.pending_changes(), 0);
        assert_eq!(world.pending_changes(), 0);

        let err = shop
            .remove_item(&mut world, owner(), SlotId(199), 2)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        shop.change_item_price(&mut world, owner(), SlotId(5), &[PricePair::native(2)])
            .unwrap();
        assert!(shop
            .change_fee_percent(&mut world, owner(), 99_000)
            .is_err());

        assert_eq!(shop.get_inventory_count(), 200);
        assert_eq!(shop.inventory_slot(SlotId(199)).unwrap().quantity, 1);
        assert_eq!(shop.price_pair(SlotId(5), 0), Some(PricePair::native(2)));
        assert_eq!(shop.fee_percent(), 4_000);
        assert_eq!(shop.journal().len(), 201);
        assert!(shop.journal().verify_chain().is_ok());
        assert_eq!(shop.state.inventory.pending_changes(), 0);
        assert_eq!(shop.state.prices.pending_changes(), 0);
        assert_eq!(world.pending_changes(), 0);
    }

    #[test]
    fn remove_zero_is_a_no_op_transfer() {
        let (mut shop, mut world) = setup();
        list_two(&mut shop, &mut world);
        let before = world.transfers().len();
        shop.remove_item(&mut world, owner(), SlotId(0), 0).unwrap();
        assert_eq!(world.transfers().len(), before);
        assert_eq!(shop.inventory_slot(SlotId(0)).unwrap().quantity, 15);
    }

    #[test]
    fn remove_returns_stock_to_owner() {
        let (mut shop, mut world) = setup();
        list_two(&mut shop, &mut world);
        shop.remove_item(&mut world, owner(), SlotId(0), 10).unwrap();
        assert_eq!(shop.inventory_slot(SlotId(0)).unwrap().quantity, 5);
        assert_eq!(world.asset_balance(addr(NFT), addr(OWNER), AssetId(1)), 15);

        let err = shop
            .remove_item(&mut world, owner(), SlotId(0), 6)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert_eq!(shop.inventory_slot(SlotId(0)).unwrap().quantity, 5);
    }

    #[test]
    fn admin_operations_reject_strangers() {
        let (mut shop, mut world) = setup();
        list_two(&mut shop, &mut world);
        let stranger = CallContext::new(addr(STRANGER));
        let results = [
            shop.remove_item(&mut world, stranger, SlotId(0), 1),
            shop.change_item_price(&mut world, stranger, SlotId(0), &[PricePair::native(1)]),
            shop.change_fee_percent(&mut world, stranger, 1),
            shop.change_royalty_percent(&mut world, stranger, 1),
            shop.change_fee_owner(&mut world, stranger, addr(STRANGER)),
            shop.change_royalty_owner(&mut world, stranger, addr(STRANGER)),
            shop.transfer_ownership(&mut world, stranger, addr(STRANGER)),
        ];
        for result in results {
            assert_eq!(result.unwrap_err().kind(), ErrorKind::Permission);
        }
        assert_eq!(shop.fee_percent(), 4_000);
        assert_eq!(shop.owner(), addr(OWNER));
    }

    #[test]
    fn non_payable_rejects_value() {
        let (mut shop, mut world) = setup();
        world.fund_native(addr(OWNER), 10);
        let err = shop
            .change_fee_percent(&mut world, owner().with_value(1), 5_000)
            .unwrap_err();
        assert_eq!(
            err,
            ShopError::NotPayable {
                operation: "changeFeePercent",
                value: 1
            }
        );
        assert_eq!(world.native_balance(addr(OWNER)), 10);
        assert_eq!(shop.fee_percent(), 4_000);
    }

    #[test]
    fn stranger_with_value_is_told_not_owner() {
        let (mut shop, mut world) = setup();
        list_two(&mut shop, &mut world);
        world.fund_native(addr(STRANGER), 10);
        let stranger = CallContext::new(addr(STRANGER)).with_value(1);

        let err = shop
            .change_fee_percent(&mut world, stranger, 5_000)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Permission);
        let err = shop
            .remove_item(&mut world, stranger, SlotId(0), 1)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Permission);

        assert_eq!(world.native_balance(addr(STRANGER)), 10);
        assert_eq!(world.native_balance(addr(SHOP)), 0);
    }

    #[test]
    fn fee_and_royalty_bounds() {
        let (mut shop, mut world) = setup();
        assert!(matches!(
            shop.change_fee_percent(&mut world, owner(), 97_000),
            Err(ShopError::InvalidFeePercent { .. })
        ));
        shop.change_fee_percent(&mut world, owner(), 96_000).unwrap();
        assert_eq!(shop.fee_percent(), 96_000);
        assert_eq!(
            shop.change_fee_owner(&mut world, owner(), Address::ZERO)
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidConfig
        );
        shop.change_royalty_owner(&mut world, owner(), addr(77)).unwrap();
        assert_eq!(shop.royalty_owner(), addr(77));
        assert_eq!(shop.get_shop_info().royalty_owner, addr(77));
    }

    #[test]
    fn price_change_shrinks_list() {
        let (mut shop, mut world) = setup();
        shop.list_items(
            &mut world,
            owner(),
            &[PricePair::native(1), PricePair::native(2), PricePair::native(3)],
            &[addr(NFT)],
            &[vec![AssetId(1)]],
            &[vec![1]],
        )
        .unwrap();
        shop.change_item_price(&mut world, owner(), SlotId(0), &[PricePair::native(9)])
            .unwrap();
        assert_eq!(shop.price_pair_length(SlotId(0)), Some(1));
        assert_eq!(shop.price_pair(SlotId(0), 0), Some(PricePair::native(9)));
        assert_eq!(shop.price_pair(SlotId(0), 1), None);
        assert_eq!(shop.price_pair(SlotId(0), 2), None);

        assert_eq!(
            shop.change_item_price(&mut world, owner(), SlotId(0), &[]),
            Err(ShopError::EmptyPriceList)
        );
        assert_eq!(
            shop.change_item_price(&mut world, owner(), SlotId(5), &[PricePair::native(1)]),
            Err(ShopError::SlotNotFound(SlotId(5)))
        );
    }

    #[test]
    fn ownership_transfer_moves_admin_rights() {
        let (mut shop, mut world) = setup();
        shop.transfer_ownership(&mut world, owner(), addr(42)).unwrap();
        assert_eq!(shop.owner(), addr(42));
        assert_eq!(
            shop.change_fee_percent(&mut world, owner(), 1).unwrap_err().kind(),
            ErrorKind::Permission
        );
        shop.change_fee_percent(&mut world, CallContext::new(addr(42)), 1)
            .unwrap();
        assert_eq!(
            shop.transfer_ownership(&mut world, CallContext::new(addr(42)), Address::ZERO),
            Err(ShopError::NullOwner)
        );
    }

    #[test]
    fn reads_distinguish_depleted_from_missing() {
        let (mut shop, mut world) = setup();
        list_two(&mut shop, &mut world);
        shop.remove_item(&mut world, owner(), SlotId(1), 5).unwrap();

        let (slot, prices) = shop.get_inventory_item(SlotId(1)).unwrap();
        assert!(slot.is_depleted());
        assert_eq!(prices, vec![PricePair::native(10)]);

        assert_eq!(
            shop.get_inventory_item(SlotId(2)).unwrap_err().kind(),
            ErrorKind::InvalidIndex
        );
        assert!(shop.inventory_slot(SlotId(2)).is_none());
        assert_eq!(shop.price_pair_length(SlotId(2)), None);
    }

    #[test]
    fn config_reopens_identical_shop() {
        let (mut shop, mut world) = setup();
        shop.change_royalty_percent(&mut world, owner(), 2_500).unwrap();
        let reopened = Shop::new(addr(SHOP + 1), shop.config()).unwrap();
        assert_eq!(reopened.get_shop_info(), shop.get_shop_info());
        assert_eq!(reopened.name(), "Armory");
    }
}
