//! Kani formal verification for percolator-lend conversion math.
//!
//! ZERO dependencies. Pure Rust. CBMC-friendly.
//!
//! KEY DESIGN DECISION: Functions use u32 inputs / u64 intermediates.
//! The production code uses u128 balances with a 256-bit intermediate, but the
//! arithmetic properties (rounding direction, conservation, bounds) are
//! scale-invariant. u32 keeps SAT formulas tractable for CBMC.
//!
//! Run all:   cargo kani --lib
//! Run one:   cargo kani --harness proof_cash_to_bonds_bracket

// ═══════════════════════════════════════════════════════════════
// Pool Math (u32/u64 mirror of percolator-lend/src/{math,liquidity,debt,liquidation}.rs)
// Arithmetic is IDENTICAL, just narrower types for CBMC tractability.
// ═══════════════════════════════════════════════════════════════

/// floor(a * b / c). None on c == 0 or a quotient past u32::MAX.
pub fn mul_div_floor(a: u32, b: u32, c: u32) -> Option<u32> {
    if c == 0 {
        return None;
    }
    let q = (a as u64) * (b as u64) / (c as u64);
    u32::try_from(q).ok()
}

/// ceil(a * b / c) = floor((a * b + c - 1) / c).
pub fn mul_div_ceil(a: u32, b: u32, c: u32) -> Option<u32> {
    if c == 0 {
        return None;
    }
    let q = ((a as u64) * (b as u64) + (c as u64 - 1)) / (c as u64);
    u32::try_from(q).ok()
}

/// Shares for liquidity. Empty pool: 1:1. Else floor.
pub fn shares_for_liquidity(total_liquidity: u32, total_shares: u32, amount: u32) -> Option<u32> {
    if total_liquidity == 0 {
        return Some(amount);
    }
    mul_div_floor(amount, total_shares, total_liquidity)
}

/// Liquidity for shares. No supply: 0. Else floor.
pub fn liquidity_for_shares(total_liquidity: u32, total_shares: u32, shares: u32) -> Option<u32> {
    if total_shares == 0 {
        return Some(0);
    }
    mul_div_floor(shares, total_liquidity, total_shares)
}

/// Bonds for borrowed debt. No debt: 1:1. Else ceil.
pub fn bonds_for_debt(total_debt: u32, total_bonds: u32, amount: u32) -> Option<u32> {
    if total_debt == 0 {
        return Some(amount);
    }
    mul_div_ceil(amount, total_bonds, total_debt)
}

/// Debt for repaid bonds. No bonds: the whole debt. Else ceil.
pub fn debt_for_bonds(total_debt: u32, total_bonds: u32, bonds: u32) -> Option<u32> {
    if total_bonds == 0 {
        return Some(total_debt);
    }
    mul_div_ceil(bonds, total_debt, total_bonds)
}

/// (to_burn, repaid, min_required_cash, max_required_cash)
pub fn cash_to_bonds(
    cash: u32,
    total_bonds: u32,
    bonds: u32,
    total_debt: u32,
) -> Option<(u32, u32, u32, u32)> {
    let max_to_burn = if total_debt == 0 {
        0
    } else {
        mul_div_floor(cash, total_bonds, total_debt)?
    };
    let to_burn = max_to_burn.min(bonds);
    if total_bonds == 0 {
        return Some((to_burn, 0, 0, 0));
    }
    let repaid = mul_div_ceil(to_burn, total_debt, total_bonds)?;
    let min_required = mul_div_floor(to_burn, total_debt, total_bonds)?;
    let max_required = to_burn
        .checked_add(1)
        .and_then(|next| mul_div_ceil(next, total_debt, total_bonds))
        .unwrap_or(u32::MAX);
    Some((to_burn, repaid, min_required, max_required))
}

// ═══════════════════════════════════════════════════════════════
// KANI PROOFS
// ═══════════════════════════════════════════════════════════════

#[cfg(kani)]
mod proofs {
    use super::*;

    // ── 1. Rounding Direction ──

    /// ceil is floor or floor + 1, never anything else.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_ceil_within_one_of_floor() {
        let a: u32 = kani::any();
        let b: u32 = kani::any();
        let c: u32 = kani::any();
        kani::assume(a < 1000 && b < 1000);
        kani::assume(c > 0 && c < 1000);

        let f = mul_div_floor(a, b, c).unwrap();
        let cl = mul_div_ceil(a, b, c).unwrap();
        assert!(cl == f || cl == f + 1);
        assert!((f as u64) * (c as u64) <= (a as u64) * (b as u64));
        assert!((cl as u64) * (c as u64) >= (a as u64) * (b as u64));
    }

    /// Minted shares never overpay the minter.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_shares_round_down() {
        let l: u32 = kani::any();
        let s: u32 = kani::any();
        let x: u32 = kani::any();
        kani::assume(l > 0 && l < 100);
        kani::assume(s < 100 && x < 100);

        let minted = shares_for_liquidity(l, s, x).unwrap();
        assert!((minted as u64) * (l as u64) <= (x as u64) * (s as u64));
    }

    /// Assigned bonds never under-charge the borrower.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_bonds_round_up() {
        let d: u32 = kani::any();
        let b: u32 = kani::any();
        let x: u32 = kani::any();
        kani::assume(d > 0 && d < 100);
        kani::assume(b < 100 && x < 100);

        let minted = bonds_for_debt(d, b, x).unwrap();
        assert!((minted as u64) * (d as u64) >= (x as u64) * (b as u64));
    }

    // ── 2. Conservation ──

    /// Mint→burn roundtrip: can't get back more than was supplied.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_mint_burn_no_profit() {
        let l: u32 = kani::any();
        let s: u32 = kani::any();
        let x: u32 = kani::any();
        kani::assume(l > 0 && l < 20);
        kani::assume(s > 0 && s < 20);
        kani::assume(x > 0 && x < 20);

        let minted = shares_for_liquidity(l, s, x).unwrap();
        let back = liquidity_for_shares(l + x, s + minted, minted).unwrap();
        assert!(back <= x);
    }

    /// Genesis mint: exact 1:1 roundtrip.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_first_mint_exact() {
        let x: u32 = kani::any();
        kani::assume(x > 0 && x < 100);

        let minted = shares_for_liquidity(0, 0, x).unwrap();
        assert_eq!(minted, x);
        assert_eq!(liquidity_for_shares(x, minted, minted), Some(x));
    }

    /// Borrow→repay of the same bonds credits at least what was borrowed.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_borrow_repay_no_loss() {
        let d: u32 = kani::any();
        let b: u32 = kani::any();
        let x: u32 = kani::any();
        kani::assume(d > 0 && d < 20);
        kani::assume(b > 0 && b < 20);
        kani::assume(x > 0 && x < 20);

        let minted = bonds_for_debt(d, b, x).unwrap();
        let credited = debt_for_bonds(d + x, b + minted, minted).unwrap();
        assert!(credited >= x);
    }

    /// Repaying every bond credits exactly the whole debt.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_full_repay_clears_debt() {
        let d: u32 = kani::any();
        let b: u32 = kani::any();
        kani::assume(d < 100 && b < 100);
        assert_eq!(debt_for_bonds(d, b, b), Some(d));
    }

    // ── 3. Liquidation Bounds ──

    /// min_required ≤ repaid ≤ max_required, repaid ≤ cash, burn ≤ victim bonds.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_cash_to_bonds_bracket() {
        let cash: u32 = kani::any();
        let tb: u32 = kani::any();
        let b: u32 = kani::any();
        let td: u32 = kani::any();
        kani::assume(cash < 100 && tb < 100 && td < 100);
        kani::assume(b <= tb);

        let (to_burn, repaid, min_req, max_req) = cash_to_bonds(cash, tb, b, td).unwrap();
        assert!(to_burn <= b);
        assert!(repaid <= cash);
        assert!(min_req <= repaid);
        assert!(repaid <= max_req);
    }

    /// No debt or no bonds: nothing burns, nothing is spent.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_cash_to_bonds_degenerate_pools() {
        let cash: u32 = kani::any();
        let b: u32 = kani::any();
        let td: u32 = kani::any();
        kani::assume(cash < 100 && b < 100 && td < 100);

        let (to_burn, repaid, _, _) = cash_to_bonds(cash, 0, b, td).unwrap();
        assert_eq!((to_burn, repaid), (0, 0));
        let (to_burn, repaid, _, _) = cash_to_bonds(cash, b, b, 0).unwrap();
        assert_eq!((to_burn, repaid), (0, 0));
    }

    /// Cash repay: spent plus change is exactly the cash offered, and the
    /// spent part never exceeds the debt the burned bonds carried.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_cash_repay_returns_change() {
        let cash: u32 = kani::any();
        let tb: u32 = kani::any();
        let b: u32 = kani::any();
        let td: u32 = kani::any();
        kani::assume(cash < 100 && tb < 100 && td < 100);
        kani::assume(b <= tb);

        let (to_burn, repaid, _, _) = cash_to_bonds(cash, tb, b, td).unwrap();
        let unspent = cash - repaid;
        assert_eq!(repaid + unspent, cash);
        assert!(repaid <= td);
        if tb > 0 {
            assert_eq!(debt_for_bonds(td, tb, to_burn), Some(repaid));
        }
    }

    // ── 4. Arithmetic Safety ──

    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_mul_div_no_panic() {
        let _ = mul_div_floor(kani::any(), kani::any(), kani::any());
        let _ = mul_div_ceil(kani::any(), kani::any(), kani::any());
    }

    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_cash_to_bonds_no_panic() {
        let _ = cash_to_bonds(kani::any(), kani::any(), kani::any(), kani::any());
    }

    // ── 5. Monotonicity ──

    /// Larger burn → ≥ liquidity.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_larger_burn_more_liquidity() {
        let l: u32 = kani::any();
        let s: u32 = kani::any();
        let sm: u32 = kani::any();
        let lg: u32 = kani::any();
        kani::assume(l < 100);
        kani::assume(s > 0 && s < 100);
        kani::assume(lg > sm && lg <= s);

        let a = liquidity_for_shares(l, s, sm).unwrap();
        let b = liquidity_for_shares(l, s, lg).unwrap();
        assert!(b >= a);
    }

    /// More cash never burns fewer bonds.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_more_cash_burns_more() {
        let tb: u32 = kani::any();
        let b: u32 = kani::any();
        let td: u32 = kani::any();
        let sm: u32 = kani::any();
        let lg: u32 = kani::any();
        kani::assume(tb < 50 && td < 50 && b <= tb);
        kani::assume(sm < lg && lg < 50);

        let (burn_s, _, _, _) = cash_to_bonds(sm, tb, b, td).unwrap();
        let (burn_l, _, _, _) = cash_to_bonds(lg, tb, b, td).unwrap();
        assert!(burn_l >= burn_s);
    }
}
