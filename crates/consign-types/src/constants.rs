//! System-wide constants for the Consign ledger.

/// Fixed-point denominator for fee and royalty percentages.
/// `100_000` represents 100.000%.
pub const PERCENT_SCALE: u64 = 100_000;

/// Decimal places carried by a scaled percentage (100_000 / 100 = 10^3).
pub const PERCENT_DECIMALS: u32 = 3;

/// Default fee percentage (4.000%).
pub const DEFAULT_FEE_PERCENT: u64 = 4_000;

/// Default royalty percentage (3.000%).
pub const DEFAULT_ROYALTY_PERCENT: u64 = 3_000;

/// Version string reported by `getShopInfo`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Consign";
