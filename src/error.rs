use solana_program::program_error::ProgramError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[repr(u32)]
pub enum LendError {
    /// Aggregate or account field would exceed MAX
    #[error("arithmetic overflow")]
    Overflow = 0,
    /// Aggregate or account field would go below zero
    #[error("arithmetic underflow")]
    Underflow = 1,
    /// total_collateral + amount exceeds MAX
    #[error("deposit overflows total collateral")]
    DepositOverflow = 2,
    /// Withdrawing (or seizing) more collateral than the account holds
    #[error("withdraw exceeds account collateral")]
    WithdrawUnderflow = 3,
    /// Burning more shares than the account holds
    #[error("burn exceeds account shares")]
    BurnTooMuch = 4,
    /// Redeemed liquidity is out on loan
    #[error("burn exceeds borrowable liquidity")]
    BurnExceedsBorrowable = 5,
    /// Borrowing more than the pool can lend
    #[error("borrow exceeds borrowable liquidity")]
    BorrowExceedsBorrowable = 6,
    /// Repaying more bonds than the account holds
    #[error("repay exceeds account bonds")]
    RepayTooMuch = 7,
    /// Repayment would credit more borrowable than total liquidity
    #[error("repay credits more than total liquidity")]
    RepayOverCredits = 8,
    /// A liquidation post-state bound failed; nothing was applied
    #[error("liquidation invariant violated")]
    LiquidationInvariantViolated = 9,
    /// Transferring more shares than the sender holds
    #[error("share transfer exceeds sender balance")]
    TransferTooMuch = 10,
    /// total_borrowable > total_liquidity
    #[error("pool is insolvent: borrowable exceeds liquidity")]
    SolvencyViolated = 11,
    /// Per-account balances do not sum to the pool aggregates
    #[error("account balances do not sum to pool totals")]
    ConservationViolated = 12,
    /// Spending or revoking more shares than the owner approved
    #[error("share transfer exceeds allowance")]
    InsufficientAllowance = 13,
}

impl From<LendError> for ProgramError {
    fn from(e: LendError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
