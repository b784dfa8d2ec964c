//! Fixed-width arithmetic over the balance domain `[0, MAX]`.
//!
//! Every pool conversion goes through `mul_div_floor` or `mul_div_ceil`.
//! Rounding rule: ceiling for anything the protocol is owed or a liability
//! assigned to a user, floor for anything credited to a user. The pool keeps
//! the dust.

use primitive_types::U256;

use crate::error::LendError;

/// Balance type shared by every pool and account field.
pub type Amount = u128;

/// Fixed-width ceiling of the balance domain.
pub const MAX: Amount = u128::MAX;

/// `a + b`, failing with `Overflow` past `MAX`. Never wraps.
pub fn checked_add(a: Amount, b: Amount) -> Result<Amount, LendError> {
    a.checked_add(b).ok_or(LendError::Overflow)
}

/// `a - b`, failing with `Underflow` below zero. Never wraps.
pub fn checked_sub(a: Amount, b: Amount) -> Result<Amount, LendError> {
    a.checked_sub(b).ok_or(LendError::Underflow)
}

/// `floor(a * b / c)` with a 256-bit intermediate product.
///
/// # Returns
/// * `Some(q)` - the quotient, rounded DOWN
/// * `None` - `c == 0`, or the quotient exceeds `MAX`
///
/// Callers guard `c == 0` themselves and define their own fallback.
pub fn mul_div_floor(a: Amount, b: Amount, c: Amount) -> Option<Amount> {
    if c == 0 {
        return None;
    }
    let product = U256::from(a) * U256::from(b);
    narrow(product / U256::from(c))
}

/// `ceil(a * b / c)` = `floor((a * b + c - 1) / c)` with a 256-bit intermediate.
///
/// # Returns
/// * `Some(q)` - the quotient, rounded UP
/// * `None` - `c == 0`, or the quotient exceeds `MAX`
pub fn mul_div_ceil(a: Amount, b: Amount, c: Amount) -> Option<Amount> {
    if c == 0 {
        return None;
    }
    let divisor = U256::from(c);
    // (MAX^2) + (MAX - 1) < 2^256, so this cannot overflow
    let product = U256::from(a) * U256::from(b) + (divisor - U256::one());
    narrow(product / divisor)
}

fn narrow(v: U256) -> Option<Amount> {
    if v > U256::from(MAX) {
        None
    } else {
        Some(v.low_u128())
    }
}
