//! Percolator Lend: single-asset lending pool accounting engine
//!
//! Three balances per account, three claims on the pool:
//! - Collateral: deposited cash backing the account's loans
//! - Shares: interest-bearing claim on the pool's liquidity (rounded DOWN for users)
//! - Bonds: the account's share of the pool's debt (rounded UP against users)
//!
//! The engine is a fixed-point state machine. It moves no tokens and verifies no
//! signatures: a host program resolves callers to keys, settles cash from the
//! returned `Receipt`, and persists `PoolState` / `Account` records as raw bytes.
//!
//! Every action accrues interest, then applies one transition:
//!   0 - Deposit:         Add collateral
//!   1 - Withdraw:        Remove collateral
//!   2 - Mint:            Supply liquidity, receive shares
//!   3 - Burn:            Redeem shares for liquidity (only what is not lent out)
//!   4 - Borrow:          Take borrowable liquidity, receive bonds
//!   5 - Repay:           Burn bonds, return their debt to borrowable
//!   6 - Liquidate:       Seize a victim's collateral to burn the victim's bonds
//!   7 - Accrue:          Fold interest into liquidity
//!   8 - TransferShares:  Move shares to another account
//!   9 - RepayWithCash:   Spend outside cash on a borrower's bonds
//!  10 - Approve:         Set a spender's share allowance
//!  11 - IncreaseAllowance
//!  12 - DecreaseAllowance
//!  13 - TransferSharesFrom: Move an owner's shares within the caller's allowance
//!
//! Mint and borrow fees are host-supplied rates (`FeeParams`), zero by default.

pub mod collateral;
pub mod debt;
pub mod engine;
pub mod error;
pub mod fees;
pub mod instruction;
pub mod interest;
pub mod liquidation;
pub mod liquidity;
pub mod math;
pub mod state;

pub use engine::{LendingPool, Receipt};
pub use error::LendError;
pub use math::{Amount, MAX};
