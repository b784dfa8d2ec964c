use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use crate::math::Amount;

/// Actions a host program can route into the lending engine.
///
/// Wire format: one tag byte, then little-endian fields.
/// Every action first accrues interest, then applies exactly one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LendInstruction {
    /// Deposit collateral.
    ///
    /// Data: amount(16)
    Deposit { amount: Amount },

    /// Withdraw collateral.
    ///
    /// Data: amount(16)
    Withdraw { amount: Amount },

    /// Deposit liquidity, receive shares (rounded down).
    ///
    /// Data: amount(16)
    Mint { amount: Amount },

    /// Burn shares, redeem liquidity (rounded down).
    ///
    /// Data: shares(16)
    Burn { shares: Amount },

    /// Borrow liquidity against newly minted bonds (rounded up).
    ///
    /// Data: amount(16)
    Borrow { amount: Amount },

    /// Burn bonds, returning their debt (rounded up) to borrowable.
    ///
    /// Data: bonds(16)
    Repay { bonds: Amount },

    /// Seize up to `cash` of the victim's collateral to burn the victim's bonds.
    ///
    /// Data: victim(32) + cash(16)
    Liquidate { victim: Pubkey, cash: Amount },

    /// Fold interest into liquidity and nothing else.
    Accrue,

    /// Move shares from the caller to `to`.
    ///
    /// Data: to(32) + shares(16)
    TransferShares { to: Pubkey, shares: Amount },

    /// Spend up to `cash` of the caller's own funds on `user`'s bonds.
    /// The unspent remainder is reported back, not kept.
    ///
    /// Data: user(32) + cash(16)
    RepayWithCash { user: Pubkey, cash: Amount },

    /// Set how many of the caller's shares `spender` may move.
    ///
    /// Data: spender(32) + amount(16)
    Approve { spender: Pubkey, amount: Amount },

    /// Data: spender(32) + delta(16)
    IncreaseAllowance { spender: Pubkey, delta: Amount },

    /// Data: spender(32) + delta(16)
    DecreaseAllowance { spender: Pubkey, delta: Amount },

    /// Move `owner`'s shares to `to`, spending the caller's allowance.
    ///
    /// Data: owner(32) + to(32) + shares(16)
    TransferSharesFrom { owner: Pubkey, to: Pubkey, shares: Amount },
}

pub const TAG_DEPOSIT: u8 = 0;
pub const TAG_WITHDRAW: u8 = 1;
pub const TAG_MINT: u8 = 2;
pub const TAG_BURN: u8 = 3;
pub const TAG_BORROW: u8 = 4;
pub const TAG_REPAY: u8 = 5;
pub const TAG_LIQUIDATE: u8 = 6;
pub const TAG_ACCRUE: u8 = 7;
pub const TAG_TRANSFER_SHARES: u8 = 8;
pub const TAG_REPAY_WITH_CASH: u8 = 9;
pub const TAG_APPROVE: u8 = 10;
pub const TAG_INCREASE_ALLOWANCE: u8 = 11;
pub const TAG_DECREASE_ALLOWANCE: u8 = 12;
pub const TAG_TRANSFER_SHARES_FROM: u8 = 13;

fn read_amount(data: &[u8]) -> Result<Amount, ProgramError> {
    let bytes: [u8; 16] = data
        .get(..16)
        .and_then(|b| b.try_into().ok())
        .ok_or(ProgramError::InvalidInstructionData)?;
    Ok(Amount::from_le_bytes(bytes))
}

fn read_key(data: &[u8]) -> Result<Pubkey, ProgramError> {
    data.get(..32)
        .and_then(|b| Pubkey::try_from(b).ok())
        .ok_or(ProgramError::InvalidInstructionData)
}

fn read_key_and_amount(data: &[u8]) -> Result<(Pubkey, Amount), ProgramError> {
    let key = read_key(data)?;
    let amount = read_amount(data.get(32..).ok_or(ProgramError::InvalidInstructionData)?)?;
    Ok((key, amount))
}

impl LendInstruction {
    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let (&tag, rest) = data.split_first().ok_or(ProgramError::InvalidInstructionData)?;

        match tag {
            TAG_DEPOSIT => Ok(Self::Deposit { amount: read_amount(rest)? }),
            TAG_WITHDRAW => Ok(Self::Withdraw { amount: read_amount(rest)? }),
            TAG_MINT => Ok(Self::Mint { amount: read_amount(rest)? }),
            TAG_BURN => Ok(Self::Burn { shares: read_amount(rest)? }),
            TAG_BORROW => Ok(Self::Borrow { amount: read_amount(rest)? }),
            TAG_REPAY => Ok(Self::Repay { bonds: read_amount(rest)? }),
            TAG_LIQUIDATE => {
                let (victim, cash) = read_key_and_amount(rest)?;
                Ok(Self::Liquidate { victim, cash })
            }
            TAG_ACCRUE => Ok(Self::Accrue),
            TAG_TRANSFER_SHARES => {
                let (to, shares) = read_key_and_amount(rest)?;
                Ok(Self::TransferShares { to, shares })
            }
            TAG_REPAY_WITH_CASH => {
                let (user, cash) = read_key_and_amount(rest)?;
                Ok(Self::RepayWithCash { user, cash })
            }
            TAG_APPROVE => {
                let (spender, amount) = read_key_and_amount(rest)?;
                Ok(Self::Approve { spender, amount })
            }
            TAG_INCREASE_ALLOWANCE => {
                let (spender, delta) = read_key_and_amount(rest)?;
                Ok(Self::IncreaseAllowance { spender, delta })
            }
            TAG_DECREASE_ALLOWANCE => {
                let (spender, delta) = read_key_and_amount(rest)?;
                Ok(Self::DecreaseAllowance { spender, delta })
            }
            TAG_TRANSFER_SHARES_FROM => {
                let owner = read_key(rest)?;
                let tail = rest.get(32..).ok_or(ProgramError::InvalidInstructionData)?;
                let (to, shares) = read_key_and_amount(tail)?;
                Ok(Self::TransferSharesFrom { owner, to, shares })
            }
            _ => Err(ProgramError::InvalidInstructionData),
        }
    }

    pub fn tag(&self) -> u8 {
        match self {
            Self::Deposit { .. } => TAG_DEPOSIT,
            Self::Withdraw { .. } => TAG_WITHDRAW,
            Self::Mint { .. } => TAG_MINT,
            Self::Burn { .. } => TAG_BURN,
            Self::Borrow { .. } => TAG_BORROW,
            Self::Repay { .. } => TAG_REPAY,
            Self::Liquidate { .. } => TAG_LIQUIDATE,
            Self::Accrue => TAG_ACCRUE,
            Self::TransferShares { .. } => TAG_TRANSFER_SHARES,
            Self::RepayWithCash { .. } => TAG_REPAY_WITH_CASH,
            Self::Approve { .. } => TAG_APPROVE,
            Self::IncreaseAllowance { .. } => TAG_INCREASE_ALLOWANCE,
            Self::DecreaseAllowance { .. } => TAG_DECREASE_ALLOWANCE,
            Self::TransferSharesFrom { .. } => TAG_TRANSFER_SHARES_FROM,
        }
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut data = vec![self.tag()];
        match self {
            Self::Deposit { amount }
            | Self::Withdraw { amount }
            | Self::Mint { amount }
            | Self::Borrow { amount } => data.extend_from_slice(&amount.to_le_bytes()),
            Self::Burn { shares } => data.extend_from_slice(&shares.to_le_bytes()),
            Self::Repay { bonds } => data.extend_from_slice(&bonds.to_le_bytes()),
            Self::Liquidate { victim: key, cash: amount }
            | Self::TransferShares { to: key, shares: amount }
            | Self::RepayWithCash { user: key, cash: amount }
            | Self::Approve { spender: key, amount }
            | Self::IncreaseAllowance { spender: key, delta: amount }
            | Self::DecreaseAllowance { spender: key, delta: amount } => {
                data.extend_from_slice(key.as_ref());
                data.extend_from_slice(&amount.to_le_bytes());
            }
            Self::Accrue => {}
            Self::TransferSharesFrom { owner, to, shares } => {
                data.extend_from_slice(owner.as_ref());
                data.extend_from_slice(to.as_ref());
                data.extend_from_slice(&shares.to_le_bytes());
            }
        }
        data
    }
}
