//! Protocol constants

/// Basis point scale (100% = 10_000)
pub const MAX_BPS: u64 = 10_000;

/// Seconds in a 365 day year
pub const SECS_PER_YEAR: u64 = 31_536_000;

/// Maximum number of strategies in the withdrawal queue
pub const MAXIMUM_STRATEGIES: usize = 20;

/// Cap on the annual management fee (100%)
pub const MAX_MANAGEMENT_FEE_BPS: u64 = MAX_BPS;

/// Cap on the vault and strategist performance fees (50% each)
pub const MAX_PERFORMANCE_FEE_BPS: u64 = MAX_BPS / 2;

/// Default annual management fee (2%)
pub const DEFAULT_MANAGEMENT_FEE_BPS: u64 = 200;

/// Default vault performance fee (10%)
pub const DEFAULT_PERFORMANCE_FEE_BPS: u64 = 1_000;

/// Block cadence of the simulated chain (6525 blocks per day)
pub const BLOCKS_PER_YEAR: u64 = 6_525 * 365;

/// Slots per epoch on the simulated chain
pub const DEFAULT_SLOTS_PER_EPOCH: u64 = 100;

/// Allowance value treated as unlimited
pub const UNLIMITED_ALLOWANCE: u64 = u64::MAX;
