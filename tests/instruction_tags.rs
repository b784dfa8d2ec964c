//! Instruction tag verification tests.
//!
//! Tags are the wire contract with host programs. Renumbering one means
//! hosts dispatch the wrong action.
//!
//!   Tag 0: Deposit
//!   Tag 1: Withdraw
//!   Tag 2: Mint
//!   Tag 3: Burn
//!   Tag 4: Borrow
//!   Tag 5: Repay
//!   Tag 6: Liquidate
//!   Tag 7: Accrue
//!   Tag 8: TransferShares
//!   Tag 9: RepayWithCash
//!   Tag 10: Approve
//!   Tag 11: IncreaseAllowance
//!   Tag 12: DecreaseAllowance
//!   Tag 13: TransferSharesFrom

use percolator_lend::instruction::LendInstruction;
use solana_program::program_error::ProgramError;
use solana_program::pubkey::Pubkey;

fn all() -> Vec<LendInstruction> {
    let key = Pubkey::new_from_array([9u8; 32]);
    vec![
        LendInstruction::Deposit { amount: 1 },
        LendInstruction::Withdraw { amount: 2 },
        LendInstruction::Mint { amount: 3 },
        LendInstruction::Burn { shares: 4 },
        LendInstruction::Borrow { amount: 5 },
        LendInstruction::Repay { bonds: 6 },
        LendInstruction::Liquidate { victim: key, cash: 7 },
        LendInstruction::Accrue,
        LendInstruction::TransferShares { to: key, shares: 8 },
        LendInstruction::RepayWithCash { user: key, cash: 9 },
        LendInstruction::Approve { spender: key, amount: 10 },
        LendInstruction::IncreaseAllowance { spender: key, delta: 11 },
        LendInstruction::DecreaseAllowance { spender: key, delta: 12 },
        LendInstruction::TransferSharesFrom { owner: key, to: key, shares: 13 },
    ]
}

#[test]
fn test_tags_are_sequential() {
    for (i, ix) in all().iter().enumerate() {
        let data = ix.pack();
        assert_eq!(data[0], i as u8, "{:?} packed with tag {}", ix, data[0]);
        assert_eq!(ix.tag(), i as u8);
    }
}

#[test]
fn test_payload_lengths() {
    for ix in all() {
        let expected = match ix {
            LendInstruction::Accrue => 1,
            LendInstruction::TransferSharesFrom { .. } => 1 + 32 + 32 + 16,
            LendInstruction::Liquidate { .. }
            | LendInstruction::TransferShares { .. }
            | LendInstruction::RepayWithCash { .. }
            | LendInstruction::Approve { .. }
            | LendInstruction::IncreaseAllowance { .. }
            | LendInstruction::DecreaseAllowance { .. } => 1 + 32 + 16,
            _ => 1 + 16,
        };
        assert_eq!(ix.pack().len(), expected, "{:?}", ix);
    }
}

#[test]
fn test_liquidate_layout() {
    let victim = Pubkey::new_from_array([0xAB; 32]);
    let data = LendInstruction::Liquidate { victim, cash: 0x0102 }.pack();
    assert_eq!(&data[1..33], victim.as_ref());
    // u128 little-endian
    assert_eq!(data[33], 0x02);
    assert_eq!(data[34], 0x01);
    assert!(data[35..].iter().all(|&b| b == 0));
}

#[test]
fn test_transfer_shares_from_layout() {
    let owner = Pubkey::new_from_array([0x11; 32]);
    let to = Pubkey::new_from_array([0x22; 32]);
    let data = LendInstruction::TransferSharesFrom { owner, to, shares: 0x0304 }.pack();
    assert_eq!(&data[1..33], owner.as_ref());
    assert_eq!(&data[33..65], to.as_ref());
    assert_eq!(data[65], 0x04);
    assert_eq!(data[66], 0x03);
}

#[test]
fn test_every_instruction_decodes_to_itself() {
    for ix in all() {
        assert_eq!(LendInstruction::unpack(&ix.pack()), Ok(ix));
    }
}

#[test]
fn test_truncated_payloads_rejected() {
    for ix in all() {
        let data = ix.pack();
        if data.len() == 1 {
            continue;
        }
        assert_eq!(
            LendInstruction::unpack(&data[..data.len() - 1]),
            Err(ProgramError::InvalidInstructionData),
            "{:?}",
            ix
        );
    }
}

#[test]
fn test_unknown_tags_rejected() {
    for tag in 14u8..=255 {
        assert_eq!(
            LendInstruction::unpack(&[tag]),
            Err(ProgramError::InvalidInstructionData)
        );
    }
}
