//! Collateral ledger: per-account and aggregate collateral balances.

use crate::error::LendError;
use crate::math::{checked_add, checked_sub, Amount};
use crate::state::{Account, PoolState};

/// Credit `amount` of collateral to `account`.
///
/// Only the aggregate add can overflow: the account's balance never exceeds
/// `total_collateral` while collateral is conserved.
pub fn deposit(
    pool: &PoolState,
    account: &Account,
    amount: Amount,
) -> Result<(PoolState, Account), LendError> {
    let total_collateral =
        checked_add(pool.total_collateral, amount).map_err(|_| LendError::DepositOverflow)?;
    let collateral = checked_add(account.collateral, amount)?;

    Ok((
        PoolState { total_collateral, ..*pool },
        Account { collateral, ..*account },
    ))
}

/// Debit `amount` of collateral from `account`.
pub fn withdraw(
    pool: &PoolState,
    account: &Account,
    amount: Amount,
) -> Result<(PoolState, Account), LendError> {
    let collateral =
        checked_sub(account.collateral, amount).map_err(|_| LendError::WithdrawUnderflow)?;
    let total_collateral = checked_sub(pool.total_collateral, amount)?;

    Ok((
        PoolState { total_collateral, ..*pool },
        Account { collateral, ..*account },
    ))
}
