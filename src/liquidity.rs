//! Share-based accounting of interest-bearing liquidity.
//!
//! Shares are a claim on `total_liquidity`. Minting credits shares to the
//! depositor (floor), burning credits liquidity to the redeemer (floor), so a
//! mint→burn cycle never returns more than was put in.

use crate::error::LendError;
use crate::math::{checked_add, checked_sub, mul_div_floor, Amount};
use crate::state::{Account, PoolState};

/// Fold externally supplied interest into the pool's liquidity.
///
/// Every action runs on the returned pool: its `last_total_liquidity` is
/// `total_liquidity_now`. Interest raises liquidity but not borrowable, so it
/// lands on the debt side.
pub fn accrue(pool: &PoolState, interest: Amount) -> Result<PoolState, LendError> {
    let last_total_liquidity = checked_add(pool.last_total_liquidity, interest)?;
    Ok(PoolState { last_total_liquidity, ..*pool })
}

/// Shares minted for depositing `amount` of liquidity (rounds DOWN).
///
/// Empty pool (no liquidity): 1:1.
pub fn shares_for_liquidity(pool: &PoolState, amount: Amount) -> Result<Amount, LendError> {
    let total_liquidity = pool.last_total_liquidity;
    if total_liquidity == 0 {
        return Ok(amount);
    }
    mul_div_floor(amount, pool.total_shares, total_liquidity).ok_or(LendError::Overflow)
}

/// Liquidity redeemed by burning `shares` (rounds DOWN).
///
/// This is also the value of a share balance. No shares outstanding → 0.
pub fn liquidity_for_shares(pool: &PoolState, shares: Amount) -> Result<Amount, LendError> {
    let total_shares = pool.total_shares;
    if total_shares == 0 {
        return Ok(0);
    }
    mul_div_floor(shares, pool.last_total_liquidity, total_shares).ok_or(LendError::Overflow)
}

/// Deposit `amount` of liquidity, receive shares pro-rata.
///
/// The deposited cash is immediately borrowable.
pub fn mint(
    pool: &PoolState,
    account: &Account,
    amount: Amount,
) -> Result<(PoolState, Account), LendError> {
    mint_with_fee(pool, account, amount, 0)
}

/// [`mint`] with `fee` paid on top of `amount`.
///
/// Shares are priced on `amount` alone. The fee joins liquidity and
/// borrowable, so it accrues to every shareholder.
pub fn mint_with_fee(
    pool: &PoolState,
    account: &Account,
    amount: Amount,
    fee: Amount,
) -> Result<(PoolState, Account), LendError> {
    let supplied = checked_add(amount, fee)?;
    let minted = shares_for_liquidity(pool, amount)?;

    let total_shares = checked_add(pool.total_shares, minted)?;
    let shares = checked_add(account.shares, minted)?;
    let last_total_liquidity = checked_add(pool.last_total_liquidity, supplied)?;
    let total_borrowable = checked_add(pool.total_borrowable, supplied)?;

    Ok((
        PoolState {
            total_shares,
            last_total_liquidity,
            total_borrowable,
            ..*pool
        },
        Account { shares, ..*account },
    ))
}

/// Redeem `shares` for liquidity.
///
/// Fails `BurnExceedsBorrowable` when the redeemed liquidity is out on loan.
pub fn burn(
    pool: &PoolState,
    account: &Account,
    shares: Amount,
) -> Result<(PoolState, Account), LendError> {
    let new_shares = checked_sub(account.shares, shares).map_err(|_| LendError::BurnTooMuch)?;
    let withdrawn = liquidity_for_shares(pool, shares)?;

    let total_borrowable = checked_sub(pool.total_borrowable, withdrawn)
        .map_err(|_| LendError::BurnExceedsBorrowable)?;
    let total_shares = checked_sub(pool.total_shares, shares)?;
    // withdrawn <= total_liquidity because shares <= total_shares
    let last_total_liquidity = checked_sub(pool.last_total_liquidity, withdrawn)?;

    Ok((
        PoolState {
            total_shares,
            last_total_liquidity,
            total_borrowable,
            ..*pool
        },
        Account { shares: new_shares, ..*account },
    ))
}

/// Move `shares` between two accounts. Aggregates are untouched.
///
/// Callers handle `from == to` (a no-op) before splitting the records.
pub fn transfer_shares(
    from: &Account,
    to: &Account,
    shares: Amount,
) -> Result<(Account, Account), LendError> {
    let from_shares =
        checked_sub(from.shares, shares).map_err(|_| LendError::TransferTooMuch)?;
    let to_shares = checked_add(to.shares, shares)?;

    Ok((
        Account { shares: from_shares, ..*from },
        Account { shares: to_shares, ..*to },
    ))
}
