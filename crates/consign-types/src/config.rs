//! Shop configuration and the public info tuple.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Result, ShopError, constants};

/// Returns `true` when a fee/royalty pair leaves a strictly positive
/// remainder for the seller.
#[must_use]
pub fn split_within_scale(fee_percent: u64, royalty_percent: u64) -> bool {
    fee_percent
        .checked_add(royalty_percent)
        .is_some_and(|sum| sum < constants::PERCENT_SCALE)
}

/// Render a scaled percentage as a decimal percent (`15000` → `15.000`).
#[must_use]
pub fn scaled_percent(value: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(value), constants::PERCENT_DECIMALS)
}

fn default_version() -> String {
    constants::VERSION.to_string()
}

/// Everything needed to open a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Display name of the shop.
    pub name: String,
    /// The single administrative owner.
    pub owner: Address,
    /// Recipient of the fee cut.
    pub fee_owner: Address,
    /// Fee cut, scaled by [`constants::PERCENT_SCALE`].
    pub fee_percent: u64,
    /// Recipient of the royalty cut.
    pub royalty_owner: Address,
    /// Royalty cut, scaled by [`constants::PERCENT_SCALE`].
    pub royalty_percent: u64,
    /// Static version metadata.
    #[serde(default = "default_version")]
    pub version: String,
}

impl ShopConfig {
    /// Config with the default 4% fee and 3% royalty.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        owner: Address,
        fee_owner: Address,
        royalty_owner: Address,
    ) -> Self {
        Self {
            name: name.into(),
            owner,
            fee_owner,
            fee_percent: constants::DEFAULT_FEE_PERCENT,
            royalty_owner,
            royalty_percent: constants::DEFAULT_ROYALTY_PERCENT,
            version: default_version(),
        }
    }

    #[must_use]
    pub fn with_percents(mut self, fee_percent: u64, royalty_percent: u64) -> Self {
        self.fee_percent = fee_percent;
        self.royalty_percent = royalty_percent;
        self
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ShopError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the same bounds the setters enforce after construction.
    pub fn validate(&self) -> Result<()> {
        if self.owner.is_zero() {
            return Err(ShopError::NullOwner);
        }
        if self.fee_owner.is_zero() {
            return Err(ShopError::NullFeeOwner);
        }
        if self.royalty_owner.is_zero() {
            return Err(ShopError::NullRoyaltyOwner);
        }
        if !split_within_scale(self.fee_percent, self.royalty_percent) {
            return Err(ShopError::InvalidFeePercent {
                requested: self.fee_percent,
                other: self.royalty_percent,
                scale: constants::PERCENT_SCALE,
            });
        }
        Ok(())
    }
}

/// Public view returned by `getShopInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopInfo {
    pub name: String,
    pub fee_owner: Address,
    pub fee_percent: u64,
    pub royalty_owner: Address,
    pub royalty_percent: u64,
    pub version: String,
}

impl ShopInfo {
    /// Fee as a decimal percentage.
    #[must_use]
    pub fn fee_percent_decimal(&self) -> Decimal {
        scaled_percent(self.fee_percent)
    }

    /// Royalty as a decimal percentage.
    #[must_use]
    pub fn royalty_percent_decimal(&self) -> Decimal {
        scaled_percent(self.royalty_percent)
    }
}

impl std::fmt::Display for ShopInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} v{} (fee {}% -> {}, royalty {}% -> {})",
            self.name,
            self.version,
            self.fee_percent_decimal(),
            self.fee_owner,
            self.royalty_percent_decimal(),
            self.royalty_owner,
        )
    }
}
