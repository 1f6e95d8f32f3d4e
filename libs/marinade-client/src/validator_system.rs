use crate::{calc::proportional, checks::check_address, error::MarinadeError, list::List};
use anchor_lang::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, AnchorSerialize, AnchorDeserialize)]
pub struct ValidatorRecord {
    /// Validator vote pubkey
    pub validator_account: Pubkey,

    /// Validator total balance in lamports
    pub active_balance: u64,
    pub score: u32,
    pub last_stake_delta_epoch: u64,
    pub duplication_flag_bump_seed: u8,
}

impl ValidatorRecord {
    pub const DISCRIMINATOR: &'static [u8; 8] = b"validatr";
    pub const DUPLICATE_FLAG_SEED: &'static [u8] = b"unique_validator";

    pub fn find_duplication_flag(
        program_id: &Pubkey,
        state: &Pubkey,
        validator_account: &Pubkey,
    ) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[
                &state.to_bytes()[..32],
                Self::DUPLICATE_FLAG_SEED,
                &validator_account.to_bytes()[..32],
            ],
            program_id,
        )
    }

    pub fn with_duplication_flag_seeds<R, F: FnOnce(&[&[u8]]) -> R>(
        &self,
        state: &Pubkey,
        f: F,
    ) -> R {
        f(&[
            &state.to_bytes()[..32],
            Self::DUPLICATE_FLAG_SEED,
            &self.validator_account.to_bytes()[..32],
            &[self.duplication_flag_bump_seed],
        ])
    }

    pub fn duplication_flag_address(&self, program_id: &Pubkey, state: &Pubkey) -> Pubkey {
        self.with_duplication_flag_seeds(state, |seeds| {
            Pubkey::create_program_address(seeds, program_id)
        })
        .unwrap()
    }
}

#[derive(Clone, AnchorSerialize, AnchorDeserialize, Debug)]
pub struct ValidatorSystem {
    pub validator_list: List,
    pub manager_authority: Pubkey,
    pub total_validator_score: u32,
    /// sum of all active lamports staked
    pub total_active_balance: u64,
    /// allow & auto-add validator when a user deposits a stake-account of a non-listed validator
    pub auto_add_validator_enabled: u8,
}

impl ValidatorSystem {
    pub fn validator_list_address(&self) -> &Pubkey {
        &self.validator_list.account
    }

    pub fn validator_count(&self) -> u32 {
        self.validator_list.len()
    }

    pub fn validator_list_capacity(&self, validator_list_len: usize) -> Result<u32> {
        self.validator_list.capacity(validator_list_len)
    }

    pub fn validator_record_size(&self) -> u32 {
        self.validator_list.item_size()
    }

    pub fn get(&self, validator_list_data: &[u8], index: u32) -> Result<ValidatorRecord> {
        self.validator_list
            .get(validator_list_data, index, "validator_list")
    }

    /// All records in list order, together with the capacity of the backing
    /// account.
    pub fn validator_records(
        &self,
        validator_list_data: &[u8],
    ) -> Result<(Vec<ValidatorRecord>, u32)> {
        Ok((
            self.validator_list
                .records(validator_list_data, "validator_list")?,
            self.validator_list.capacity(validator_list_data.len())?,
        ))
    }

    /// proportional-to-score slice of the total stake target for one validator
    pub fn validator_stake_target(
        &self,
        validator: &ValidatorRecord,
        total_stake_target: u64,
    ) -> Result<u64> {
        if self.total_validator_score == 0 {
            return Ok(0);
        }
        proportional(
            total_stake_target,
            validator.score as u64,
            self.total_validator_score as u64,
        )
    }

    /// Validate a fetched validator list account (address and discriminator)
    /// before reading records out of it.
    pub fn check_validator_list(&self, address: &Pubkey, data: &[u8]) -> Result<()> {
        check_address(address, self.validator_list_address(), "validator_list")?;
        if data.len() < 8 || &data[0..8] != ValidatorRecord::DISCRIMINATOR {
            msg!("Wrong validator list account discriminator");
            return err!(MarinadeError::InvalidValidatorListDiscriminator);
        }
        Ok(())
    }
}
