//! Mint and borrow fees.
//!
//! A fee is charged on top of the principal and stays in the pool: a mint fee
//! joins liquidity without minting shares, a borrow fee joins the borrower's
//! debt. With both rates at zero every transition prices exactly as without
//! fees.

use bytemuck::{Pod, Zeroable};

use crate::error::LendError;
use crate::interest::RATE_SCALE;
use crate::math::{mul_div_ceil, Amount};

/// Fee rates in `RATE_SCALE` units, supplied by the host. Zero by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct FeeParams {
    /// Paid by the minter on top of the supplied liquidity
    pub mint_fee: Amount,
    /// Added to the borrower's debt on top of the borrowed liquidity
    pub borrow_fee: Amount,
}

pub const FEE_PARAMS_SIZE: usize = core::mem::size_of::<FeeParams>();

/// `amount * rate / RATE_SCALE`, rounded UP so the pool never under-charges.
pub fn fee_for(amount: Amount, rate: Amount) -> Result<Amount, LendError> {
    mul_div_ceil(amount, rate, RATE_SCALE).ok_or(LendError::Overflow)
}
