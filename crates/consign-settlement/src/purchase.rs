//! Purchase settlement.
//!
//! `purchase_item` is a straight line:
//! 1. validate the slot, the quantity, and the price index
//! 2. split the total into fee, royalty, and remainder
//! 3. confirm the buyer can pay on the chosen rail
//! 4. decrement stock (before any external transfer)
//! 5. pay fee owner, royalty owner, and shop owner; refund excess native value
//! 6. deliver the asset to the buyer
//!
//! A failure at any step rolls back everything, including step 4.

use consign_types::{
    Address, Amount, AssetClass, CallId, PricePair, Quantity, Result, ShopError, ShopEvent, SlotId,
};
use serde::{Deserialize, Serialize};

use crate::rails::Host;
use crate::shop::{Call, CallContext, Entry, Shop};
use crate::split::{FeeSchedule, Split};

/// What a successful purchase did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub call_id: CallId,
    pub slot: SlotId,
    pub buyer: Address,
    pub quantity: Quantity,
    pub price_index: usize,
    pub pair: PricePair,
    pub split: Split,
    /// Native value returned to the buyer.
    pub refund: Amount,
    /// Stock left in the slot.
    pub remaining: Quantity,
}

impl Shop {
    /// Buy `quantity` units of `slot`, paying with price pair `price_index`.
    ///
    /// Native pairs are paid from the value attached to `ctx`; any excess is
    /// refunded. Fungible pairs are pulled from the buyer, who must have
    /// approved the shop for at least the total; attached value is refunded
    /// in full.
    ///
    /// # Errors
    /// - `SlotNotFound` / `PriceIndexOutOfRange` for bad indices
    /// - `InsufficientStock` for a zero or over-limit quantity
    /// - `InsufficientNative`, `InsufficientTokenBalance`, or
    ///   `InsufficientAllowance` when the buyer cannot pay
    pub fn purchase_item<H: Host>(
        &mut self,
        host: &mut H,
        ctx: CallContext,
        slot: SlotId,
        quantity: Quantity,
        price_index: usize,
    ) -> Result<PurchaseReceipt> {
        self.execute(host, ctx, "purchaseItem", Entry::Payable, |state, host, call| {
            let item = state.inventory.check_saleable(slot, quantity)?.clone();
            let pair = state.prices.select(slot, price_index)?;
            let split = state.fees.split(pair.unit_price, quantity)?;
            ensure_can_pay(host, call, &pair, &split)?;

            let remaining = state.inventory.withdraw(slot, quantity)?;

            let owner = state.access.owner();
            let refund = settle(host, call, &state.fees, owner, &pair, &split)?;
            host.transfer_asset(
                item.asset_contract,
                call.shop,
                call.shop,
                call.caller,
                item.asset_id,
                quantity,
            )?;

            state.journal.record(
                call.id,
                ShopEvent::ItemPurchased {
                    slot,
                    buyer: call.caller,
                    quantity,
                    price_index,
                    pair,
                    total: split.total,
                    fee: split.fee,
                    royalty: split.royalty,
                    remainder: split.remainder,
                    refund,
                },
            )?;
            tracing::info!(
                call_id = %call.id,
                %slot,
                buyer = %call.caller,
                quantity,
                rail = %pair.asset_class,
                total = split.total,
                fee = split.fee,
                royalty = split.royalty,
                remainder = split.remainder,
                refund,
                remaining,
                "item purchased"
            );
            Ok(PurchaseReceipt {
                call_id: call.id,
                slot,
                buyer: call.caller,
                quantity,
                price_index,
                pair,
                split,
                refund,
                remaining,
            })
        })
    }
}

/// Fail early, with a buyer-facing error, if the chosen rail cannot cover the total.
fn ensure_can_pay<H: Host>(host: &H, call: &Call, pair: &PricePair, split: &Split) -> Result<()> {
    match pair.asset_class {
        AssetClass::Native => {
            if call.value < split.total {
                return Err(ShopError::InsufficientNative {
                    needed: split.total,
                    supplied: call.value,
                });
            }
        }
        AssetClass::Fungible => {
            let token = pair.payment_asset;
            let available = host.token_balance(token, call.caller);
            if available < split.total {
                return Err(ShopError::InsufficientTokenBalance {
                    token,
                    needed: split.total,
                    available,
                });
            }
            let approved = host.allowance(token, call.caller, call.shop);
            if approved < split.total {
                return Err(ShopError::InsufficientAllowance {
                    token,
                    needed: split.total,
                    approved,
                });
            }
        }
    }
    Ok(())
}

/// Pay the three recipients and return the native refund owed to the buyer.
fn settle<H: Host>(
    host: &mut H,
    call: &Call,
    fees: &FeeSchedule,
    owner: Address,
    pair: &PricePair,
    split: &Split,
) -> Result<Amount> {
    let payouts = [
        (fees.fee_owner, split.fee),
        (fees.royalty_owner, split.royalty),
        (owner, split.remainder),
    ];
    let refund = match pair.asset_class {
        AssetClass::Native => {
            for (to, amount) in payouts {
                if amount > 0 {
                    host.transfer_native(call.shop, to, amount)?;
                }
            }
            call.value - split.total
        }
        AssetClass::Fungible => {
            for (to, amount) in payouts {
                host.transfer_from(pair.payment_asset, call.shop, call.caller, to, amount)?;
            }
            call.value
        }
    };
    if refund > 0 {
        host.transfer_native(call.shop, call.caller, refund)?;
    }
    Ok(refund)
}
