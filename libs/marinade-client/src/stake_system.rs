use crate::{checks::check_address, error::MarinadeError, list::List};
use anchor_lang::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, AnchorSerialize, AnchorDeserialize)]
pub struct StakeRecord {
    pub stake_account: Pubkey,
    pub last_update_delegated_lamports: u64,
    pub last_update_epoch: u64,
    pub is_emergency_unstaking: u8, // 1 for cooling down after emergency unstake, 0 otherwise
}

impl StakeRecord {
    pub const DISCRIMINATOR: &'static [u8; 8] = b"staker__";
}

#[derive(Clone, AnchorSerialize, AnchorDeserialize, Debug)]
pub struct StakeSystem {
    pub stake_list: List,
    pub delayed_unstake_cooling_down: u64,
    pub stake_deposit_bump_seed: u8,
    pub stake_withdraw_bump_seed: u8,

    /// set by admin, how much slots before the end of the epoch, stake-delta can start
    pub slots_for_stake_delta: u64,
    /// Marks the start of stake-delta operations, meaning that if somebody starts a delayed-unstake ticket
    /// after this var is set with epoch_num the ticket will have epoch_created = current_epoch+1
    /// (the user must wait one more epoch, because their unstake-delta will be execute in this epoch)
    pub last_stake_delta_epoch: u64,
    pub min_stake: u64, // Minimal stake account delegation
    /// can be set by validator-manager-auth to allow a second run of stake-delta to stake late stakers in the last minute of the epoch
    /// so we maximize user's rewards
    pub extra_stake_delta_runs: u32,
}

impl StakeSystem {
    pub const STAKE_WITHDRAW_SEED: &'static [u8] = b"withdraw";
    pub const STAKE_DEPOSIT_SEED: &'static [u8] = b"deposit";

    pub fn find_stake_withdraw_authority(program_id: &Pubkey, state: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[&state.to_bytes()[..32], Self::STAKE_WITHDRAW_SEED],
            program_id,
        )
    }

    pub fn find_stake_deposit_authority(program_id: &Pubkey, state: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[&state.to_bytes()[..32], Self::STAKE_DEPOSIT_SEED],
            program_id,
        )
    }

    /// stake withdraw authority from the bump seed recorded on chain
    pub fn stake_withdraw_authority(&self, program_id: &Pubkey, state: &Pubkey) -> Pubkey {
        Pubkey::create_program_address(
            &[
                &state.to_bytes()[..32],
                Self::STAKE_WITHDRAW_SEED,
                &[self.stake_withdraw_bump_seed],
            ],
            program_id,
        )
        .unwrap()
    }

    pub fn stake_deposit_authority(&self, program_id: &Pubkey, state: &Pubkey) -> Pubkey {
        Pubkey::create_program_address(
            &[
                &state.to_bytes()[..32],
                Self::STAKE_DEPOSIT_SEED,
                &[self.stake_deposit_bump_seed],
            ],
            program_id,
        )
        .unwrap()
    }

    pub fn stake_list_address(&self) -> &Pubkey {
        &self.stake_list.account
    }

    pub fn stake_count(&self) -> u32 {
        self.stake_list.len()
    }

    pub fn stake_list_capacity(&self, stake_list_len: usize) -> Result<u32> {
        self.stake_list.capacity(stake_list_len)
    }

    pub fn stake_record_size(&self) -> u32 {
        self.stake_list.item_size()
    }

    pub fn get(&self, stake_list_data: &[u8], index: u32) -> Result<StakeRecord> {
        self.stake_list.get(stake_list_data, index, "stake_list")
    }

    /// All records in list order, together with the capacity of the backing
    /// account.
    pub fn stake_records(&self, stake_list_data: &[u8]) -> Result<(Vec<StakeRecord>, u32)> {
        Ok((
            self.stake_list.records(stake_list_data, "stake_list")?,
            self.stake_list.capacity(stake_list_data.len())?,
        ))
    }

    /// Validate a fetched stake list account (address and discriminator)
    /// before reading records out of it.
    pub fn check_stake_list(&self, address: &Pubkey, data: &[u8]) -> Result<()> {
        check_address(address, self.stake_list_address(), "stake_list")?;
        if data.len() < 8 || &data[0..8] != StakeRecord::DISCRIMINATOR {
            msg!("Wrong stake list account discriminator");
            return err!(MarinadeError::InvalidStakeListDiscriminator);
        }
        Ok(())
    }
}
