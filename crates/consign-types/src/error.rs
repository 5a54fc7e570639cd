//! Error types for the Consign ledger.
//!
//! All errors use the `SHOP_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Input validation errors
//! - 2xx: Stock and funds errors
//! - 3xx: Index errors
//! - 4xx: Permission errors
//! - 5xx: Configuration errors
//! - 6xx: External collaborator errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{Address, Amount, AssetId, Quantity, SlotId};

/// Coarse classification of a [`ShopError`].
///
/// Callers that only care about *which* invariant was violated (and not the
/// detail) match on this instead of the full enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    InsufficientStock,
    InsufficientFunds,
    InvalidIndex,
    Permission,
    InvalidConfig,
    External,
    Internal,
}

/// Central error enum for all Consign operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShopError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// `listItems` was called without any asset contract.
    #[error("SHOP_ERR_100: You must list at least one item")]
    NoItemsListed,

    /// A listing or price change carried an empty price list.
    #[error("SHOP_ERR_101: You must set at least one price pair for an item")]
    EmptyPriceList,

    /// `assetContracts` and `idGroups` differ in length.
    #[error("SHOP_ERR_102: Asset contracts length ({contracts}) mismatched with id groups length ({groups})")]
    IdGroupsMismatch { contracts: usize, groups: usize },

    /// `assetContracts` and `quantityGroups` differ in length.
    #[error("SHOP_ERR_103: Asset contracts length ({contracts}) mismatched with quantity groups length ({groups})")]
    QuantityGroupsMismatch { contracts: usize, groups: usize },

    /// An id group is empty.
    #[error("SHOP_ERR_104: You must specify at least one item id (group {group})")]
    EmptyIdGroup { group: usize },

    /// An id group and its quantity group differ in length.
    #[error("SHOP_ERR_105: Item ids length ({ids}) mismatched with quantities length ({quantities}) in group {group}")]
    IdQuantityMismatch {
        group: usize,
        ids: usize,
        quantities: usize,
    },

    /// A listing quantity was zero.
    #[error("SHOP_ERR_106: You cannot list an item with no starting quantity (group {group}, index {index})")]
    ZeroListingQuantity { group: usize, index: usize },

    /// Native value was attached to an operation that does not accept it.
    #[error("SHOP_ERR_107: {operation} is not payable (attached {value})")]
    NotPayable { operation: &'static str, value: Amount },

    /// An address string could not be parsed.
    #[error("SHOP_ERR_108: Invalid address: {0}")]
    InvalidAddress(String),

    // =================================================================
    // Stock / Funds Errors (2xx)
    // =================================================================
    /// Not enough stock in the slot (also raised for zero-quantity purchases).
    #[error("SHOP_ERR_200: Not enough stock in {slot}: requested {requested}, available {available}")]
    InsufficientStock {
        slot: SlotId,
        requested: Quantity,
        available: Quantity,
    },

    /// Attached native value does not cover the purchase.
    #[error("SHOP_ERR_201: Not enough native value sent: need {needed}, supplied {supplied}")]
    InsufficientNative { needed: Amount, supplied: Amount },

    /// Buyer's payment-token balance does not cover the purchase.
    #[error("SHOP_ERR_202: Not enough payment token {token}: need {needed}, have {available}")]
    InsufficientTokenBalance {
        token: Address,
        needed: Amount,
        available: Amount,
    },

    /// Buyer has not authorized the engine to pull enough payment token.
    #[error("SHOP_ERR_203: Payment token {token} allowance too low: need {needed}, approved {approved}")]
    InsufficientAllowance {
        token: Address,
        needed: Amount,
        approved: Amount,
    },

    /// An account cannot cover a native-currency transfer.
    #[error("SHOP_ERR_204: Native balance of {account} too low: need {needed}, have {available}")]
    InsufficientNativeBalance {
        account: Address,
        needed: Amount,
        available: Amount,
    },

    // =================================================================
    // Index Errors (3xx)
    // =================================================================
    /// The slot id was never created.
    #[error("SHOP_ERR_300: Wrong inventory item id: {0}")]
    SlotNotFound(SlotId),

    /// The price index is past the end of the slot's price list.
    #[error("SHOP_ERR_301: Price index {index} is not valid for {slot} ({len} price pairs)")]
    PriceIndexOutOfRange { slot: SlotId, index: usize, len: usize },

    // =================================================================
    // Permission Errors (4xx)
    // =================================================================
    /// A non-owner called an administrative operation.
    #[error("SHOP_ERR_400: Caller {caller} is not the owner")]
    NotOwner { caller: Address },

    // =================================================================
    // Configuration Errors (5xx)
    // =================================================================
    /// New fee percentage would push fee + royalty to or past 100%.
    #[error("SHOP_ERR_500: Invalid fee percent {requested}: royalty is {other}, sum must stay below {scale}")]
    InvalidFeePercent { requested: u64, other: u64, scale: u64 },

    /// New royalty percentage would push fee + royalty to or past 100%.
    #[error("SHOP_ERR_501: Invalid royalty percent {requested}: fee is {other}, sum must stay below {scale}")]
    InvalidRoyaltyPercent { requested: u64, other: u64, scale: u64 },

    /// Null address supplied for the fee owner.
    #[error("SHOP_ERR_502: Invalid fee owner: null address")]
    NullFeeOwner,

    /// Null address supplied for the royalty owner.
    #[error("SHOP_ERR_503: Invalid royalty owner: null address")]
    NullRoyaltyOwner,

    /// Null address supplied for the administrative owner.
    #[error("SHOP_ERR_504: Invalid owner: null address")]
    NullOwner,

    /// Configuration could not be loaded.
    #[error("SHOP_ERR_505: Configuration error: {0}")]
    Configuration(String),

    // =================================================================
    // External Collaborator Errors (6xx)
    // =================================================================
    /// The asset registry refused a transfer because the operator is not approved.
    #[error("SHOP_ERR_600: {operator} is not approved to move assets of {owner} on {contract}")]
    AssetNotApproved {
        contract: Address,
        owner: Address,
        operator: Address,
    },

    /// The asset registry refused a transfer because the holder lacks units.
    #[error("SHOP_ERR_601: {holder} holds {available} of {contract}{id}, needs {needed}")]
    AssetBalanceTooLow {
        contract: Address,
        id: AssetId,
        holder: Address,
        needed: Quantity,
        available: Quantity,
    },

    /// A collaborator rejected a call for a reason of its own.
    #[error("SHOP_ERR_602: External call rejected: {0}")]
    ExternalRejected(String),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Checked arithmetic overflowed.
    #[error("SHOP_ERR_900: Arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),

    /// Unrecoverable internal error.
    #[error("SHOP_ERR_901: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("SHOP_ERR_902: Serialization error: {0}")]
    Serialization(String),

    /// A journal entry's digest does not match its recomputed value.
    #[error("SHOP_ERR_903: Journal digest mismatch at entry {0}")]
    JournalCorrupted(u64),
}

impl ShopError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoItemsListed
            | Self::EmptyPriceList
            | Self::IdGroupsMismatch { .. }
            | Self::QuantityGroupsMismatch { .. }
            | Self::EmptyIdGroup { .. }
            | Self::IdQuantityMismatch { .. }
            | Self::ZeroListingQuantity { .. }
            | Self::NotPayable { .. }
            | Self::InvalidAddress(_) => ErrorKind::Validation,
            Self::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            Self::InsufficientNative { .. }
            | Self::InsufficientTokenBalance { .. }
            | Self::InsufficientAllowance { .. }
            | Self::InsufficientNativeBalance { .. } => ErrorKind::InsufficientFunds,
            Self::SlotNotFound(_) | Self::PriceIndexOutOfRange { .. } => ErrorKind::InvalidIndex,
            Self::NotOwner { .. } => ErrorKind::Permission,
            Self::InvalidFeePercent { .. }
            | Self::InvalidRoyaltyPercent { .. }
            | Self::NullFeeOwner
            | Self::NullRoyaltyOwner
            | Self::NullOwner
            | Self::Configuration(_) => ErrorKind::InvalidConfig,
            Self::AssetNotApproved { .. }
            | Self::AssetBalanceTooLow { .. }
            | Self::ExternalRejected(_) => ErrorKind::External,
            Self::ArithmeticOverflow(_)
            | Self::Internal(_)
            | Self::Serialization(_)
            | Self::JournalCorrupted(_) => ErrorKind::Internal,
        }
    }

    /// The stable `SHOP_ERR_nnn` code of this error.
    #[must_use]
    pub fn code(&self) -> String {
        let msg = self.to_string();
        msg.split(':').next().unwrap_or_default().to_string()
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, ShopError>;

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
