//! Cash-to-bond conversion. Seized collateral (liquidation) or an outside
//! payer's cash (repay with cash) burns a borrower's bonds at the pool's
//! current bond price.

use crate::debt::total_debt;
use crate::error::LendError;
use crate::math::{checked_add, mul_div_ceil, mul_div_floor, Amount};
use crate::state::{Account, PoolState};

/// Outcome of converting cash into a bond burn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashToBonds {
    /// Bonds burned: `min(max_to_burn, bonds)`
    pub to_burn: Amount,
    /// Cash spent, credited back to borrowable (rounds UP)
    pub repaid: Amount,
    /// `floor(to_burn * total_debt / total_bonds)`
    pub min_required_cash: Amount,
    /// `ceil((to_burn + 1) * total_debt / total_bonds)`
    pub max_required_cash: Amount,
}

/// Convert `cash` into a burn of at most `bonds` bonds.
///
/// # Arguments
/// * `cash` - Cash available to repay with
/// * `total_bonds` - Bonds outstanding in the pool
/// * `bonds` - The victim's bonds (caps the burn)
/// * `total_debt` - Debt outstanding in the pool
///
/// # Invariant
/// `min_required_cash <= repaid <= max_required_cash` and `repaid <= cash`.
pub fn cash_to_bonds(
    cash: Amount,
    total_bonds: Amount,
    bonds: Amount,
    total_debt: Amount,
) -> Result<CashToBonds, LendError> {
    let max_to_burn = if total_debt == 0 {
        0
    } else {
        mul_div_floor(cash, total_bonds, total_debt).ok_or(LendError::LiquidationInvariantViolated)?
    };
    let to_burn = max_to_burn.min(bonds);

    if total_bonds == 0 {
        return Ok(CashToBonds {
            to_burn,
            repaid: 0,
            min_required_cash: 0,
            max_required_cash: 0,
        });
    }

    let repaid = mul_div_ceil(to_burn, total_debt, total_bonds)
        .ok_or(LendError::LiquidationInvariantViolated)?;
    let min_required_cash = mul_div_floor(to_burn, total_debt, total_bonds)
        .ok_or(LendError::LiquidationInvariantViolated)?;
    // One bond past to_burn may price above MAX; the bound is then MAX itself
    let max_required_cash = to_burn
        .checked_add(1)
        .and_then(|next| mul_div_ceil(next, total_debt, total_bonds))
        .unwrap_or(Amount::MAX);

    Ok(CashToBonds {
        to_burn,
        repaid,
        min_required_cash,
        max_required_cash,
    })
}

/// Seize up to `cash` of `victim`'s collateral to burn the victim's bonds.
///
/// Only the cash actually spent (`repaid`) leaves the victim's collateral.
/// Every post-state bound is checked before anything is returned, so a failure
/// leaves both the collateral ledger and the bond book untouched.
pub fn liquidate(
    pool: &PoolState,
    victim: &Account,
    cash: Amount,
) -> Result<(PoolState, Account, CashToBonds), LendError> {
    if cash > victim.collateral {
        return Err(LendError::WithdrawUnderflow);
    }
    let debt = total_debt(pool)?;
    let conversion = cash_to_bonds(cash, pool.total_bonds, victim.bonds, debt)?;
    let (pool, victim) = burn_converted(pool, victim, &conversion, cash)?;

    let collateral = victim
        .collateral
        .checked_sub(conversion.repaid)
        .ok_or(LendError::LiquidationInvariantViolated)?;
    let total_collateral = pool
        .total_collateral
        .checked_sub(conversion.repaid)
        .ok_or(LendError::LiquidationInvariantViolated)?;

    Ok((
        PoolState { total_collateral, ..pool },
        Account { collateral, ..victim },
        conversion,
    ))
}

/// Spend up to `cash` from an outside payer on `borrower`'s bonds.
///
/// The payer's cash never touches the ledger: `repaid` is credited to
/// borrowable and the host hands `cash - repaid` back to the payer.
pub fn repay_with_cash(
    pool: &PoolState,
    borrower: &Account,
    cash: Amount,
) -> Result<(PoolState, Account, CashToBonds), LendError> {
    let debt = total_debt(pool)?;
    let conversion = cash_to_bonds(cash, pool.total_bonds, borrower.bonds, debt)?;
    let (pool, borrower) = burn_converted(pool, borrower, &conversion, cash)?;
    Ok((pool, borrower, conversion))
}

/// Apply a conversion to the bond book: burn `to_burn`, credit `repaid`.
fn burn_converted(
    pool: &PoolState,
    borrower: &Account,
    conversion: &CashToBonds,
    cash: Amount,
) -> Result<(PoolState, Account), LendError> {
    if conversion.repaid > cash {
        return Err(LendError::LiquidationInvariantViolated);
    }
    let total_borrowable = checked_add(pool.total_borrowable, conversion.repaid)
        .map_err(|_| LendError::LiquidationInvariantViolated)?;
    if total_borrowable > pool.last_total_liquidity {
        return Err(LendError::LiquidationInvariantViolated);
    }
    let bonds = borrower
        .bonds
        .checked_sub(conversion.to_burn)
        .ok_or(LendError::LiquidationInvariantViolated)?;
    let total_bonds = pool
        .total_bonds
        .checked_sub(conversion.to_burn)
        .ok_or(LendError::LiquidationInvariantViolated)?;
    if bonds > total_bonds {
        return Err(LendError::LiquidationInvariantViolated);
    }

    Ok((
        PoolState {
            total_borrowable,
            total_bonds,
            ..*pool
        },
        Account { bonds, ..*borrower },
    ))
}
