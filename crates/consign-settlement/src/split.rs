//! Fixed-point fee / royalty / remainder split.
//!
//! Percentages are integers over [`PERCENT_SCALE`]. Each cut is floored;
//! the seller's remainder absorbs the rounding so that
//! ```text
//! fee + royalty + remainder == unit_price * quantity
//! ```
//! holds exactly for every sale.

use consign_types::constants::PERCENT_SCALE;
use consign_types::{
    Address, Amount, Quantity, Result, ShopError, constants, split_within_scale,
};
use serde::{Deserialize, Serialize};

/// Who receives a cut of every sale, and how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub fee_owner: Address,
    pub fee_percent: u64,
    pub royalty_owner: Address,
    pub royalty_percent: u64,
}

/// The result of splitting one sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub total: Amount,
    pub fee: Amount,
    pub royalty: Amount,
    pub remainder: Amount,
}

/// `floor(amount * percent / PERCENT_SCALE)` without overflowing on the
/// intermediate product.
///
/// With `amount = q * S + r`, the floor equals `q * percent + floor(r * percent / S)`.
pub fn scaled_cut(amount: Amount, percent: u64) -> Result<Amount> {
    let scale = u128::from(PERCENT_SCALE);
    let percent = u128::from(percent);
    let whole = (amount / scale)
        .checked_mul(percent)
        .ok_or(ShopError::ArithmeticOverflow("scaled cut"))?;
    // r < S and percent <= u64::MAX, so the product fits in u128.
    let part = (amount % scale) * percent / scale;
    whole
        .checked_add(part)
        .ok_or(ShopError::ArithmeticOverflow("scaled cut"))
}

impl FeeSchedule {
    /// Split the sale of `quantity` units at `unit_price`.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if `unit_price * quantity` does not fit.
    pub fn split(&self, unit_price: Amount, quantity: Quantity) -> Result<Split> {
        let total = unit_price
            .checked_mul(quantity)
            .ok_or(ShopError::ArithmeticOverflow("purchase total"))?;
        let fee = scaled_cut(total, self.fee_percent)?;
        let royalty = scaled_cut(total, self.royalty_percent)?;
        let remainder = total
            .checked_sub(fee)
            .and_then(|r| r.checked_sub(royalty))
            .ok_or(ShopError::ArithmeticOverflow("seller remainder"))?;
        Ok(Split {
            total,
            fee,
            royalty,
            remainder,
        })
    }

    /// # Errors
    /// `InvalidFeePercent` if the new fee would leave no remainder.
    pub fn set_fee_percent(&mut self, percent: u64) -> Result<u64> {
        if !split_within_scale(percent, self.royalty_percent) {
            return Err(ShopError::InvalidFeePercent {
                requested: percent,
                other: self.royalty_percent,
                scale: constants::PERCENT_SCALE,
            });
        }
        Ok(std::mem::replace(&mut self.fee_percent, percent))
    }

    /// # Errors
    /// `InvalidRoyaltyPercent` if the new royalty would leave no remainder.
    pub fn set_royalty_percent(&mut self, percent: u64) -> Result<u64> {
        if !split_within_scale(self.fee_percent, percent) {
            return Err(ShopError::InvalidRoyaltyPercent {
                requested: percent,
                other: self.fee_percent,
                scale: constants::PERCENT_SCALE,
            });
        }
        Ok(std::mem::replace(&mut self.royalty_percent, percent))
    }

    /// # Errors
    /// `NullFeeOwner` for the null address.
    pub fn set_fee_owner(&mut self, owner: Address) -> Result<Address> {
        if owner.is_zero() {
            return Err(ShopError::NullFeeOwner);
        }
        Ok(std::mem::replace(&mut self.fee_owner, owner))
    }

    /// # Errors
    /// `NullRoyaltyOwner` for the null address.
    pub fn set_royalty_owner(&mut self, owner: Address) -> Result<Address> {
        if owner.is_zero() {
            return Err(ShopError::NullRoyaltyOwner);
        }
        Ok(std::mem::replace(&mut self.royalty_owner, owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn schedule(fee: u64, royalty: u64) -> FeeSchedule {
        FeeSchedule {
            fee_owner: Address::from_low_u64(3),
            fee_percent: fee,
            royalty_owner: Address::from_low_u64(4),
            royalty_percent: royalty,
        }
    }

    #[test]
    fn fifteen_twenty_five_sixty() {
        let split = schedule(15_000, 25_000).split(100, 10_000).unwrap();
        assert_eq!(split.total, 1_000_000);
        assert_eq!(split.fee, 150_000);
        assert_eq!(split.royalty, 250_000);
        assert_eq!(split.remainder, 600_000);
    }

    #[test]
    fn rounding_goes_to_remainder() {
        // 7 * 4.000% = 0.28 -> 0, 7 * 3.000% = 0.21 -> 0
        let split = schedule(4_000, 3_000).split(7, 1).unwrap();
        assert_eq!(split.fee, 0);
        assert_eq!(split.royalty, 0);
        assert_eq!(split.remainder, 7);

        let split = schedule(33_333, 33_333).split(1, 100).unwrap();
        assert_eq!(split.fee, 33);
        assert_eq!(split.royalty, 33);
        assert_eq!(split.remainder, 34);
    }

    #[test]
    fn parts_always_sum_to_total() {
        let mut rng = rand::thread_rng();
        for _ in 0..1_000 {
            let fee = rng.gen_range(0..50_000);
            let royalty = rng.gen_range(0..50_000);
            let price: u128 = rng.gen_range(0..u128::from(u64::MAX));
            let qty: u128 = rng.gen_range(1..1_000_000);
            let split = schedule(fee, royalty).split(price, qty).unwrap();
            assert_eq!(split.fee + split.royalty + split.remainder, split.total);
            assert_eq!(split.total, price * qty);
        }
    }

    #[test]
    fn scaled_cut_matches_naive_formula() {
        let mut rng = rand::thread_rng();
        for _ in 0..1_000 {
            let amount: u128 = rng.gen_range(0..u128::from(u64::MAX));
            let percent = rng.gen_range(0..PERCENT_SCALE);
            let naive = amount * u128::from(percent) / u128::from(PERCENT_SCALE);
            assert_eq!(scaled_cut(amount, percent).unwrap(), naive);
        }
    }

    #[test]
    fn scaled_cut_survives_huge_amounts() {
        let cut = scaled_cut(u128::MAX, 99_999).unwrap();
        assert!(cut < u128::MAX);
    }

    #[test]
    fn total_overflow_is_reported() {
        let err = schedule(0, 0).split(u128::MAX, 2).unwrap_err();
        assert_eq!(err, ShopError::ArithmeticOverflow("purchase total"));
    }

    #[test]
    fn percent_setters_keep_sum_below_scale() {
        let mut s = schedule(4_000, 3_000);
        assert!(matches!(
            s.set_fee_percent(97_000),
            Err(ShopError::InvalidFeePercent { .. })
        ));
        assert_eq!(s.set_fee_percent(96_000).unwrap(), 4_000);
        assert!(matches!(
            s.set_royalty_percent(96_000),
            Err(ShopError::InvalidRoyaltyPercent { .. })
        ));
        assert_eq!(s.set_royalty_percent(3_900).unwrap(), 3_000);
        // Setting the same value again is fine.
        assert_eq!(s.set_fee_percent(96_000).unwrap(), 96_000);
        assert_eq!(s.fee_percent + s.royalty_percent, 99_900);
    }

    #[test]
    fn owner_setters_reject_null() {
        let mut s = schedule(1, 1);
        assert_eq!(s.set_fee_owner(Address::ZERO), Err(ShopError::NullFeeOwner));
        assert_eq!(
            s.set_royalty_owner(Address::ZERO),
            Err(ShopError::NullRoyaltyOwner)
        );
        let alice = Address::from_low_u64(10);
        assert_eq!(s.set_fee_owner(alice).unwrap(), Address::from_low_u64(3));
        assert_eq!(s.fee_owner, alice);
    }
}
