//! Utilization-based interest model.
//!
//! The engine accepts any externally supplied interest; this is the accrual
//! source a host uses when it has nothing better. Rates are per second,
//! fixed-point with `RATE_SCALE`.

use bytemuck::{Pod, Zeroable};

use crate::error::LendError;
use crate::math::{checked_add, checked_sub, mul_div_ceil, mul_div_floor, Amount};
use crate::state::PoolState;

/// 1.0 in rate units.
pub const RATE_SCALE: Amount = 1_000_000_000_000_000_000;

/// Rate curve parameters, supplied by the host.
///
/// The charged rate is the larger of two curves:
/// * standard: `standard_min_rate + standard_rate * utilization`
/// * emergency: `emergency_max_rate - emergency_rate * (1 - utilization)`
///
/// The emergency curve keeps rates high when borrowable liquidity runs dry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct RateParams {
    pub standard_rate: Amount,
    pub standard_min_rate: Amount,
    pub emergency_rate: Amount,
    pub emergency_max_rate: Amount,
}

/// Accrual clock: never runs backwards past the last accrual.
pub fn current_time(block_timestamp: u64, updated_at: u64) -> u64 {
    block_timestamp.max(updated_at)
}

/// Per-second rate for the given liquidity and borrowable balances.
pub fn interest_rate(
    params: &RateParams,
    total_liquidity: Amount,
    total_borrowable: Amount,
) -> Result<Amount, LendError> {
    if total_liquidity == 0 {
        return Ok(params.standard_min_rate.max(params.emergency_max_rate));
    }
    let debt = checked_sub(total_liquidity, total_borrowable)
        .map_err(|_| LendError::SolvencyViolated)?;

    // Both quotients are bounded by their rate: debt, borrowable <= liquidity
    let standard_scaled =
        mul_div_floor(params.standard_rate, debt, total_liquidity).ok_or(LendError::Overflow)?;
    let emergency_scaled = mul_div_floor(params.emergency_rate, total_borrowable, total_liquidity)
        .ok_or(LendError::Overflow)?;

    let standard = checked_add(params.standard_min_rate, standard_scaled)?;
    // a rate, not a balance: the emergency curve floors at zero
    let emergency = params
        .emergency_max_rate
        .checked_sub(emergency_scaled)
        .unwrap_or(0);

    Ok(standard.max(emergency))
}

/// Interest owed on the pool's debt over `elapsed` seconds (rounds UP).
pub fn accrued_interest(
    params: &RateParams,
    total_liquidity: Amount,
    total_borrowable: Amount,
    elapsed: u64,
) -> Result<Amount, LendError> {
    let debt = checked_sub(total_liquidity, total_borrowable)
        .map_err(|_| LendError::SolvencyViolated)?;
    if elapsed == 0 || debt == 0 {
        return Ok(0);
    }
    let rate = interest_rate(params, total_liquidity, total_borrowable)?;
    let matured = rate
        .checked_mul(Amount::from(elapsed))
        .ok_or(LendError::Overflow)?;
    mul_div_ceil(debt, matured, RATE_SCALE).ok_or(LendError::Overflow)
}

/// Interest pending on `pool` at `now`, and the timestamp to record once it
/// is folded in.
pub fn pending_interest(
    pool: &PoolState,
    params: &RateParams,
    now: u64,
) -> Result<(Amount, u64), LendError> {
    let now = current_time(now, pool.last_updated_at);
    let elapsed = now - pool.last_updated_at;
    let interest = accrued_interest(
        params,
        pool.last_total_liquidity,
        pool.total_borrowable,
        elapsed,
    )?;
    Ok((interest, now))
}
