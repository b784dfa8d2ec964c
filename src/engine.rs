//! The lending pool as a whole: pool aggregates, the keyed account map and
//! share allowances.
//!
//! Every action accrues interest, runs exactly one transition on copies of the
//! touched records and commits only if that transition succeeded. A failed
//! action leaves the pool exactly as it was.

use std::collections::BTreeMap;

use solana_program::{msg, pubkey::Pubkey};

use crate::collateral;
use crate::debt;
use crate::error::LendError;
use crate::fees::{fee_for, FeeParams};
use crate::instruction::LendInstruction;
use crate::interest::{pending_interest, RateParams};
use crate::liquidation;
use crate::liquidity;
use crate::math::{checked_add, checked_sub, Amount};
use crate::state::{Account, PoolState};

/// What a committed action moved. The host settles the cash side from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receipt {
    Deposited { amount: Amount },
    Withdrawn { amount: Amount },
    /// The minter pays `liquidity + fee`.
    Minted { liquidity: Amount, shares: Amount, fee: Amount },
    Burned { shares: Amount, liquidity: Amount },
    /// The borrower receives `liquidity` and owes `liquidity + fee`.
    Borrowed { liquidity: Amount, bonds: Amount, fee: Amount },
    Repaid { bonds: Amount, credited: Amount },
    /// `repaid` is the collateral actually seized from `victim`.
    Liquidated { victim: Pubkey, repaid: Amount, bonds_burned: Amount },
    Accrued { total_liquidity: Amount },
    SharesTransferred { to: Pubkey, shares: Amount },
    /// The payer spent `repaid` on `user`'s bonds and keeps `unspent`.
    RepaidWithCash { user: Pubkey, repaid: Amount, bonds_burned: Amount, unspent: Amount },
    /// The caller's allowance for `spender` is now `amount`.
    AllowanceSet { spender: Pubkey, amount: Amount },
    SharesTransferredFrom { owner: Pubkey, to: Pubkey, shares: Amount },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LendingPool {
    pool: PoolState,
    accounts: BTreeMap<Pubkey, Account>,
    /// (owner, spender) → shares the spender may move. Zero entries are dropped.
    allowances: BTreeMap<(Pubkey, Pubkey), Amount>,
    fees: FeeParams,
}

impl LendingPool {
    /// Genesis pool: every aggregate zero, no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a pool from host-persisted records. Zeroed accounts are dropped.
    pub fn from_parts(
        pool: PoolState,
        accounts: impl IntoIterator<Item = (Pubkey, Account)>,
    ) -> Self {
        let accounts = accounts
            .into_iter()
            .filter(|(_, account)| !account.is_empty())
            .collect();
        Self {
            pool,
            accounts,
            ..Self::default()
        }
    }

    /// Restore host-persisted allowances. Zero entries are dropped.
    pub fn with_allowances(
        mut self,
        allowances: impl IntoIterator<Item = ((Pubkey, Pubkey), Amount)>,
    ) -> Self {
        self.allowances = allowances
            .into_iter()
            .filter(|(_, amount)| *amount != 0)
            .collect();
        self
    }

    /// Charge `fees` on every later mint and borrow.
    pub fn with_fees(mut self, fees: FeeParams) -> Self {
        self.fees = fees;
        self
    }

    pub fn fees(&self) -> &FeeParams {
        &self.fees
    }

    pub fn pool(&self) -> &PoolState {
        &self.pool
    }

    /// Balances of `key`; an unknown key reads as zero.
    pub fn account(&self, key: &Pubkey) -> Account {
        self.accounts.get(key).copied().unwrap_or_default()
    }

    /// Every non-empty account, in key order.
    pub fn accounts(&self) -> impl Iterator<Item = (&Pubkey, &Account)> {
        self.accounts.iter()
    }

    /// Shares `spender` may still move out of `owner`'s balance.
    pub fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> Amount {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    /// Every non-zero allowance, keyed by (owner, spender).
    pub fn allowances(&self) -> impl Iterator<Item = (&(Pubkey, Pubkey), &Amount)> {
        self.allowances.iter()
    }

    /// Liquidity `key`'s shares redeem for, as of the last accrual (rounds DOWN).
    pub fn share_value(&self, key: &Pubkey) -> Result<Amount, LendError> {
        liquidity::liquidity_for_shares(&self.pool, self.account(key).shares)
    }

    /// Debt `key`'s bonds owe, as of the last accrual (rounds UP).
    pub fn debt_owed(&self, key: &Pubkey) -> Result<Amount, LendError> {
        let bonds = self.account(key).bonds;
        if bonds == 0 {
            return Ok(0);
        }
        debt::debt_for_bonds(&self.pool, bonds)
    }

    /// Accrue `interest`, then apply `instruction` on behalf of `caller`.
    pub fn apply(
        &mut self,
        caller: &Pubkey,
        instruction: &LendInstruction,
        interest: Amount,
    ) -> Result<Receipt, LendError> {
        let pool = liquidity::accrue(&self.pool, interest)?;
        let account = self.account(caller);

        match *instruction {
            LendInstruction::Deposit { amount } => {
                let (pool, account) = collateral::deposit(&pool, &account, amount)?;
                self.commit(pool, &[(*caller, account)]);
                msg!("Deposited {} collateral", amount);
                Ok(Receipt::Deposited { amount })
            }
            LendInstruction::Withdraw { amount } => {
                let (pool, account) = collateral::withdraw(&pool, &account, amount)?;
                self.commit(pool, &[(*caller, account)]);
                msg!("Withdrew {} collateral", amount);
                Ok(Receipt::Withdrawn { amount })
            }
            LendInstruction::Mint { amount } => {
                let fee = fee_for(amount, self.fees.mint_fee)?;
                let (after, updated) = liquidity::mint_with_fee(&pool, &account, amount, fee)?;
                let shares = checked_sub(updated.shares, account.shares)?;
                self.commit(after, &[(*caller, updated)]);
                msg!("Minted {} shares for {} liquidity, fee {}", shares, amount, fee);
                Ok(Receipt::Minted { liquidity: amount, shares, fee })
            }
            LendInstruction::Burn { shares } => {
                let (after, updated) = liquidity::burn(&pool, &account, shares)?;
                let withdrawn = checked_sub(pool.last_total_liquidity, after.last_total_liquidity)?;
                self.commit(after, &[(*caller, updated)]);
                msg!("Burned {} shares for {} liquidity", shares, withdrawn);
                Ok(Receipt::Burned { shares, liquidity: withdrawn })
            }
            LendInstruction::Borrow { amount } => {
                let fee = fee_for(amount, self.fees.borrow_fee)?;
                let (after, updated) = debt::borrow_with_fee(&pool, &account, amount, fee)?;
                let bonds = checked_sub(updated.bonds, account.bonds)?;
                self.commit(after, &[(*caller, updated)]);
                msg!("Borrowed {} liquidity against {} bonds, fee {}", amount, bonds, fee);
                Ok(Receipt::Borrowed { liquidity: amount, bonds, fee })
            }
            LendInstruction::Repay { bonds } => {
                let (after, updated) = debt::repay(&pool, &account, bonds)?;
                let credited = checked_sub(after.total_borrowable, pool.total_borrowable)?;
                self.commit(after, &[(*caller, updated)]);
                msg!("Repaid {} bonds, {} credited to borrowable", bonds, credited);
                Ok(Receipt::Repaid { bonds, credited })
            }
            LendInstruction::Liquidate { victim, cash } => {
                let target = self.account(&victim);
                let (after, target, conversion) = liquidation::liquidate(&pool, &target, cash)?;
                self.commit(after, &[(victim, target)]);
                msg!(
                    "Liquidated {}: {} collateral burned {} bonds",
                    victim,
                    conversion.repaid,
                    conversion.to_burn
                );
                Ok(Receipt::Liquidated {
                    victim,
                    repaid: conversion.repaid,
                    bonds_burned: conversion.to_burn,
                })
            }
            LendInstruction::Accrue => {
                self.commit(pool, &[]);
                msg!("Accrued {} interest", interest);
                Ok(Receipt::Accrued { total_liquidity: pool.last_total_liquidity })
            }
            LendInstruction::TransferShares { to, shares } => {
                if to == *caller {
                    if shares > account.shares {
                        return Err(LendError::TransferTooMuch);
                    }
                    self.commit(pool, &[]);
                } else {
                    let recipient = self.account(&to);
                    let (from, dest) = liquidity::transfer_shares(&account, &recipient, shares)?;
                    self.commit(pool, &[(*caller, from), (to, dest)]);
                }
                msg!("Transferred {} shares to {}", shares, to);
                Ok(Receipt::SharesTransferred { to, shares })
            }
            LendInstruction::RepayWithCash { user, cash } => {
                let borrower = self.account(&user);
                let (after, borrower, conversion) =
                    liquidation::repay_with_cash(&pool, &borrower, cash)?;
                let unspent = checked_sub(cash, conversion.repaid)?;
                self.commit(after, &[(user, borrower)]);
                msg!(
                    "Repaid {} for {}: {} bonds burned, {} unspent",
                    conversion.repaid,
                    user,
                    conversion.to_burn,
                    unspent
                );
                Ok(Receipt::RepaidWithCash {
                    user,
                    repaid: conversion.repaid,
                    bonds_burned: conversion.to_burn,
                    unspent,
                })
            }
            LendInstruction::Approve { spender, amount } => {
                self.commit(pool, &[]);
                self.set_allowance(*caller, spender, amount);
                msg!("Approved {} for {} shares", spender, amount);
                Ok(Receipt::AllowanceSet { spender, amount })
            }
            LendInstruction::IncreaseAllowance { spender, delta } => {
                let amount = checked_add(self.allowance(caller, &spender), delta)?;
                self.commit(pool, &[]);
                self.set_allowance(*caller, spender, amount);
                msg!("Approved {} for {} shares", spender, amount);
                Ok(Receipt::AllowanceSet { spender, amount })
            }
            LendInstruction::DecreaseAllowance { spender, delta } => {
                let amount = checked_sub(self.allowance(caller, &spender), delta)
                    .map_err(|_| LendError::InsufficientAllowance)?;
                self.commit(pool, &[]);
                self.set_allowance(*caller, spender, amount);
                msg!("Approved {} for {} shares", spender, amount);
                Ok(Receipt::AllowanceSet { spender, amount })
            }
            LendInstruction::TransferSharesFrom { owner, to, shares } => {
                let remaining = checked_sub(self.allowance(&owner, caller), shares)
                    .map_err(|_| LendError::InsufficientAllowance)?;
                let source = self.account(&owner);
                if to == owner {
                    if shares > source.shares {
                        return Err(LendError::TransferTooMuch);
                    }
                    self.commit(pool, &[]);
                } else {
                    let recipient = self.account(&to);
                    let (from, dest) = liquidity::transfer_shares(&source, &recipient, shares)?;
                    self.commit(pool, &[(owner, from), (to, dest)]);
                    self.set_allowance(owner, *caller, remaining);
                }
                msg!("Transferred {} shares from {} to {}", shares, owner, to);
                Ok(Receipt::SharesTransferredFrom { owner, to, shares })
            }
        }
    }

    /// Like [`apply`](Self::apply), with interest derived from `params` over the
    /// time since the last accrual. `now` is stamped on success.
    pub fn apply_at(
        &mut self,
        caller: &Pubkey,
        instruction: &LendInstruction,
        params: &RateParams,
        now: u64,
    ) -> Result<Receipt, LendError> {
        let (interest, stamped) = pending_interest(&self.pool, params, now)?;
        let receipt = self.apply(caller, instruction, interest)?;
        self.pool.last_updated_at = stamped;
        Ok(receipt)
    }

    /// Check the cross-record invariants: solvency, then conservation of
    /// collateral, shares and bonds across the account map.
    pub fn check_invariants(&self) -> Result<(), LendError> {
        if self.pool.total_borrowable > self.pool.last_total_liquidity {
            return Err(LendError::SolvencyViolated);
        }

        let mut totals = Account::default();
        for account in self.accounts.values() {
            totals = Account {
                collateral: checked_add(totals.collateral, account.collateral)
                    .map_err(|_| LendError::ConservationViolated)?,
                shares: checked_add(totals.shares, account.shares)
                    .map_err(|_| LendError::ConservationViolated)?,
                bonds: checked_add(totals.bonds, account.bonds)
                    .map_err(|_| LendError::ConservationViolated)?,
            };
        }
        if totals.collateral != self.pool.total_collateral
            || totals.shares != self.pool.total_shares
            || totals.bonds != self.pool.total_bonds
        {
            return Err(LendError::ConservationViolated);
        }
        Ok(())
    }

    fn set_allowance(&mut self, owner: Pubkey, spender: Pubkey, amount: Amount) {
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    fn commit(&mut self, pool: PoolState, accounts: &[(Pubkey, Account)]) {
        self.pool = pool;
        for (key, account) in accounts {
            if account.is_empty() {
                self.accounts.remove(key);
            } else {
                self.accounts.insert(*key, *account);
            }
        }
    }
}
