//! Decoding of native stake program accounts.

use std::ops::Deref;

use anchor_lang::prelude::*;

use crate::error::MarinadeError;

#[derive(Clone, Copy, Debug, Default, PartialEq, AnchorSerialize, AnchorDeserialize)]
pub struct Authorized {
    pub staker: Pubkey,
    pub withdrawer: Pubkey,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, AnchorSerialize, AnchorDeserialize)]
pub struct Lockup {
    pub unix_timestamp: i64,
    pub epoch: u64,
    pub custodian: Pubkey,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, AnchorSerialize, AnchorDeserialize)]
pub struct Meta {
    pub rent_exempt_reserve: u64,
    pub authorized: Authorized,
    pub lockup: Lockup,
}

#[derive(Clone, Copy, Debug, PartialEq, AnchorSerialize, AnchorDeserialize)]
pub struct Delegation {
    pub voter_pubkey: Pubkey,
    pub stake: u64,
    pub activation_epoch: u64,
    pub deactivation_epoch: u64,
    pub warmup_cooldown_rate: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, AnchorSerialize, AnchorDeserialize)]
pub struct Stake {
    pub delegation: Delegation,
    pub credits_observed: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, AnchorSerialize, AnchorDeserialize)]
pub enum StakeState {
    Uninitialized,
    Initialized(Meta),
    Stake(Meta, Stake),
    RewardsPool,
}

impl StakeState {
    pub fn meta(&self) -> Option<&Meta> {
        match self {
            Self::Initialized(meta) | Self::Stake(meta, _) => Some(meta),
            _ => None,
        }
    }

    pub fn stake(&self) -> Option<&Stake> {
        match self {
            Self::Stake(_, stake) => Some(stake),
            _ => None,
        }
    }

    pub fn delegation(&self) -> Option<&Delegation> {
        self.stake().map(|stake| &stake.delegation)
    }

    pub fn authorized(&self) -> Option<&Authorized> {
        self.meta().map(|meta| &meta.authorized)
    }
}

/// Length of the variant tag the stake program writes: a little-endian u32 of
/// which only the first byte is meaningful.
const BINCODE_TAG_LEN: usize = 4;

#[derive(Debug, Clone)]
pub struct StakeWrapper {
    pub inner: StakeState,
}

impl AccountDeserialize for StakeWrapper {
    fn try_deserialize(buf: &mut &[u8]) -> Result<Self> {
        Self::try_deserialize_unchecked(buf)
    }

    fn try_deserialize_unchecked(buf: &mut &[u8]) -> Result<Self> {
        // The stake program serializes its state with bincode: a 4-byte variant
        // tag followed by the payload. The borsh schema above wants the tag in a
        // single byte directly before the payload, so rebuild the buffer as
        // byte 0 ++ bytes[4..], discarding the tag's three padding bytes. This
        // byte surgery is specific to stake accounts, not a general padding rule.
        if buf.len() < BINCODE_TAG_LEN {
            msg!("Stake account data is too short ({} bytes)", buf.len());
            return err!(MarinadeError::InvalidStakeAccountData);
        }
        let mut realigned = Vec::with_capacity(buf.len() - (BINCODE_TAG_LEN - 1));
        realigned.push(buf[0]);
        realigned.extend_from_slice(&buf[BINCODE_TAG_LEN..]);

        let inner = StakeState::deserialize(&mut realigned.as_slice()).map_err(|err| {
            msg!("Stake account data can not be parsed ({})", err);
            error!(MarinadeError::InvalidStakeAccountData)
        })?;
        *buf = &buf[buf.len()..];
        Ok(Self { inner })
    }
}

impl Deref for StakeWrapper {
    type Target = StakeState;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Decode a batch of fetched stake accounts; `result[i]` belongs to `datas[i]`.
pub fn decode_stake_states<T: AsRef<[u8]>>(datas: &[T]) -> Result<Vec<StakeState>> {
    datas
        .iter()
        .map(|data| StakeWrapper::try_deserialize(&mut data.as_ref()).map(|wrapper| wrapper.inner))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::solana_program::stake::state as native;

    /// Stake account data length on chain.
    const STAKE_ACCOUNT_LEN: usize = 200;

    fn native_delegated_stake() -> (native::StakeState, Pubkey, Pubkey, Pubkey, Pubkey) {
        let staker = Pubkey::new_unique();
        let withdrawer = Pubkey::new_unique();
        let custodian = Pubkey::new_unique();
        let voter = Pubkey::new_unique();
        let state = native::StakeState::Stake(
            native::Meta {
                rent_exempt_reserve: 2_282_880,
                authorized: native::Authorized { staker, withdrawer },
                lockup: native::Lockup {
                    unix_timestamp: 1_600_000_000,
                    epoch: 123,
                    custodian,
                },
            },
            native::Stake {
                delegation: native::Delegation {
                    voter_pubkey: voter,
                    stake: 7_000_000_000,
                    activation_epoch: 311,
                    deactivation_epoch: u64::MAX,
                    warmup_cooldown_rate: 0.25,
                },
                credits_observed: 456_789,
            },
        );
        (state, staker, withdrawer, custodian, voter)
    }

    /// bincode-encoded account image, zero padded to the on-chain length
    fn account_data(state: &native::StakeState) -> Vec<u8> {
        let mut data = bincode::serialize(state).unwrap();
        assert!(data.len() <= STAKE_ACCOUNT_LEN);
        data.resize(STAKE_ACCOUNT_LEN, 0);
        data
    }

    #[test]
    fn test_decode_delegated_stake() -> Result<()> {
        let (state, staker, withdrawer, custodian, voter) = native_delegated_stake();
        let data = account_data(&state);
        assert_eq!(data.len(), STAKE_ACCOUNT_LEN);
        // bincode writes the tag as one meaningful byte plus padding
        assert_eq!(data[0..4], [2, 0, 0, 0]);

        let wrapper = StakeWrapper::try_deserialize(&mut data.as_slice())?;
        let meta = wrapper.meta().unwrap();
        assert_eq!(meta.rent_exempt_reserve, 2_282_880);
        assert_eq!(meta.authorized.staker, staker);
        assert_eq!(meta.authorized.withdrawer, withdrawer);
        assert_eq!(meta.lockup.unix_timestamp, 1_600_000_000);
        assert_eq!(meta.lockup.epoch, 123);
        assert_eq!(meta.lockup.custodian, custodian);

        let delegation = wrapper.delegation().unwrap();
        assert_eq!(delegation.voter_pubkey, voter);
        assert_eq!(delegation.stake, 7_000_000_000);
        assert_eq!(delegation.activation_epoch, 311);
        assert_eq!(delegation.deactivation_epoch, u64::MAX);
        assert_eq!(delegation.warmup_cooldown_rate, 0.25);
        assert_eq!(wrapper.stake().unwrap().credits_observed, 456_789);
        Ok(())
    }

    #[test]
    fn test_realignment_matches_plain_borsh() -> Result<()> {
        // decoding tag ++ bytes[4..] through the generic decoder must agree
        // with the wrapper decoding the raw account image
        let (state, ..) = native_delegated_stake();
        let data = account_data(&state);

        let mut corrected = vec![data[0]];
        corrected.extend_from_slice(&data[4..]);
        let direct = StakeState::deserialize(&mut corrected.as_slice()).unwrap();

        let wrapper = StakeWrapper::try_deserialize(&mut data.as_slice())?;
        assert_eq!(wrapper.inner, direct);
        Ok(())
    }

    #[test]
    fn test_decode_non_delegated_variants() -> Result<()> {
        let uninitialized = account_data(&native::StakeState::Uninitialized);
        let wrapper = StakeWrapper::try_deserialize(&mut uninitialized.as_slice())?;
        assert_eq!(wrapper.inner, StakeState::Uninitialized);
        assert!(wrapper.delegation().is_none());

        let rewards_pool = account_data(&native::StakeState::RewardsPool);
        let wrapper = StakeWrapper::try_deserialize(&mut rewards_pool.as_slice())?;
        assert_eq!(wrapper.inner, StakeState::RewardsPool);
        Ok(())
    }

    #[test]
    fn test_decode_failures() {
        // shorter than the tag itself
        assert!(StakeWrapper::try_deserialize(&mut &[2u8, 0][..]).is_err());
        // unknown variant tag
        let mut data = vec![0u8; STAKE_ACCOUNT_LEN];
        data[0] = 9;
        assert!(StakeWrapper::try_deserialize(&mut data.as_slice()).is_err());
        // truncated payload for a delegated stake
        let (state, ..) = native_delegated_stake();
        let data = account_data(&state);
        assert!(StakeWrapper::try_deserialize(&mut &data[..40]).is_err());
    }

    #[test]
    fn test_decode_stake_states_order() -> Result<()> {
        let (delegated, ..) = native_delegated_stake();
        let datas = vec![
            account_data(&native::StakeState::Uninitialized),
            account_data(&delegated),
        ];
        let states = decode_stake_states(&datas)?;
        assert_eq!(states.len(), 2);
        assert_eq!(states[0], StakeState::Uninitialized);
        assert!(states[1].delegation().is_some());
        Ok(())
    }
}
