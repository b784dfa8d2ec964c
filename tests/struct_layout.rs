//! Struct layout verification tests.
//!
//! Ensures bytemuck Pod compliance and that record sizes
//! don't accidentally change (would break host-persisted state).

use bytemuck::{Pod, Zeroable};
use percolator_lend::fees::{FeeParams, FEE_PARAMS_SIZE};
use percolator_lend::interest::RateParams;
use percolator_lend::state::{Account, PoolState, ACCOUNT_SIZE, POOL_STATE_SIZE};

#[test]
fn test_pool_state_size_is_96() {
    // If this changes, persisted pools become unreadable.
    assert_eq!(POOL_STATE_SIZE, 96);
    assert_eq!(std::mem::size_of::<PoolState>(), 96);
}

#[test]
fn test_account_size_is_48() {
    assert_eq!(ACCOUNT_SIZE, 48);
    assert_eq!(std::mem::size_of::<Account>(), 48);
}

#[test]
fn test_rate_params_size_is_64() {
    assert_eq!(std::mem::size_of::<RateParams>(), 64);
}

#[test]
fn test_fee_params_size_is_32() {
    assert_eq!(FEE_PARAMS_SIZE, 32);
    assert_eq!(FeeParams::zeroed(), FeeParams::default());
}

#[test]
fn test_alignment_follows_amount() {
    assert_eq!(std::mem::align_of::<PoolState>(), std::mem::align_of::<u128>());
    assert_eq!(std::mem::align_of::<Account>(), std::mem::align_of::<u128>());
}

#[test]
fn test_pool_state_zeroed_is_genesis() {
    let pool = PoolState::zeroed();
    assert_eq!(pool.total_collateral, 0);
    assert_eq!(pool.last_total_liquidity, 0);
    assert_eq!(pool.total_shares, 0);
    assert_eq!(pool.total_borrowable, 0);
    assert_eq!(pool.total_bonds, 0);
    assert_eq!(pool.last_updated_at, 0);
}

#[test]
fn test_account_zeroed_is_empty() {
    assert!(Account::zeroed().is_empty());
}

#[test]
fn test_bytemuck_roundtrip_pool() {
    let pool = PoolState {
        total_collateral: 1_000_000,
        last_total_liquidity: u128::MAX,
        total_shares: 500_000,
        total_borrowable: 42,
        total_bonds: 7,
        last_updated_at: 12345,
        ..PoolState::zeroed()
    };

    // Serialize
    let bytes: &[u8] = bytemuck::bytes_of(&pool);
    assert_eq!(bytes.len(), POOL_STATE_SIZE);

    // Deserialize (copy: a byte slice carries no u128 alignment guarantee)
    let recovered: PoolState = bytemuck::pod_read_unaligned(bytes);
    assert_eq!(recovered, pool);
}

#[test]
fn test_bytemuck_roundtrip_account() {
    let account = Account { collateral: 1, shares: 2, bonds: u128::MAX };

    let bytes: &[u8] = bytemuck::bytes_of(&account);
    assert_eq!(bytes.len(), ACCOUNT_SIZE);

    let recovered: Account = bytemuck::pod_read_unaligned(bytes);
    assert_eq!(recovered, account);
}

#[test]
fn test_amounts_are_little_endian() {
    let account = Account { collateral: 1, ..Account::zeroed() };
    let bytes = bytemuck::bytes_of(&account);
    if cfg!(target_endian = "little") {
        assert_eq!(bytes[0], 1);
        assert!(bytes[1..].iter().all(|&b| b == 0));
    }
}

#[test]
fn test_pod_zeroable_impls() {
    // These compile-time checks ensure Pod + Zeroable derive is valid
    fn assert_pod<T: Pod + Zeroable>() {}
    assert_pod::<PoolState>();
    assert_pod::<Account>();
    assert_pod::<RateParams>();
    assert_pod::<FeeParams>();
}

/// Field offset verification: no hidden padding changes
#[test]
fn test_pool_state_field_offsets() {
    let pool = PoolState::zeroed();
    let base = &pool as *const _ as usize;

    assert_eq!(&pool.total_collateral as *const _ as usize - base, 0);
    assert_eq!(&pool.last_total_liquidity as *const _ as usize - base, 16);
    assert_eq!(&pool.total_shares as *const _ as usize - base, 32);
    assert_eq!(&pool.total_borrowable as *const _ as usize - base, 48);
    assert_eq!(&pool.total_bonds as *const _ as usize - base, 64);
    assert_eq!(&pool.last_updated_at as *const _ as usize - base, 80);
    assert_eq!(&pool._padding as *const _ as usize - base, 88);
}

#[test]
fn test_account_field_offsets() {
    let account = Account::zeroed();
    let base = &account as *const _ as usize;

    assert_eq!(&account.collateral as *const _ as usize - base, 0);
    assert_eq!(&account.shares as *const _ as usize - base, 16);
    assert_eq!(&account.bonds as *const _ as usize - base, 32);
}
