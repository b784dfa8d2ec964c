use bytemuck::{Pod, Zeroable};

use crate::math::Amount;

/// Pool aggregates, one per lending pool.
///
/// Zeroed is the genesis state. The host persists this record as raw bytes,
/// so the layout is frozen (see `POOL_STATE_SIZE`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct PoolState {
    /// Sum of every account's collateral
    pub total_collateral: Amount,

    /// Liquidity (principal plus interest) as of the last accrual.
    /// Operations run on the accrued value, `total_liquidity_now`.
    pub last_total_liquidity: Amount,

    /// Sum of every account's shares
    pub total_shares: Amount,

    /// Liquidity not currently lent out. Never exceeds total liquidity.
    pub total_borrowable: Amount,

    /// Sum of every account's bonds
    pub total_bonds: Amount,

    /// Timestamp of the last model-driven accrual (see `interest`)
    pub last_updated_at: u64,

    /// Padding for alignment
    pub _padding: [u8; 8],
}

/// Size of PoolState in bytes
pub const POOL_STATE_SIZE: usize = core::mem::size_of::<PoolState>();

/// Per-account balances, keyed by caller identity.
/// A zeroed record is the same as no record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Account {
    pub collateral: Amount,
    pub shares: Amount,
    pub bonds: Amount,
}

/// Size of Account in bytes
pub const ACCOUNT_SIZE: usize = core::mem::size_of::<Account>();

impl PoolState {
    /// Liquidity currently lent out: `total_liquidity - total_borrowable`.
    /// Only meaningful on an accrued pool.
    pub fn total_debt(&self) -> Option<Amount> {
        self.last_total_liquidity.checked_sub(self.total_borrowable)
    }
}

impl Account {
    pub fn is_empty(&self) -> bool {
        self.collateral == 0 && self.shares == 0 && self.bonds == 0
    }
}
