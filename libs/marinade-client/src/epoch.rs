//! Epoch timing estimates built from cluster facts fetched by the caller.

use anchor_lang::solana_program::clock::DEFAULT_MS_PER_SLOT;

/// Raw epoch progress as reported by the cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpochInfo {
    pub epoch: u64,
    pub slot_index: u64,
    pub slots_in_epoch: u64,
    pub absolute_slot: u64,
}

/// [EpochInfo] enriched with wall-clock estimates from an average slot
/// duration. Recomputed on every query, never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessedEpochInfo {
    pub epoch: u64,
    pub slot_index: u64,
    pub slots_in_epoch: u64,
    pub absolute_slot: u64,

    pub ms_elapsed: u64,
    pub ms_until_epoch_end: u64,
    /// 0..=100
    pub epoch_progress: f64,
    pub avg_slot_duration_ms: u64,
    pub slots_remaining_in_epoch: u64,
}

impl ProcessedEpochInfo {
    pub fn process(info: &EpochInfo, avg_slot_duration_ms: u64) -> Self {
        let slots_remaining_in_epoch = info.slots_in_epoch.saturating_sub(info.slot_index);
        Self {
            epoch: info.epoch,
            slot_index: info.slot_index,
            slots_in_epoch: info.slots_in_epoch,
            absolute_slot: info.absolute_slot,
            ms_elapsed: info.slot_index * avg_slot_duration_ms,
            ms_until_epoch_end: slots_remaining_in_epoch * avg_slot_duration_ms,
            epoch_progress: info.slot_index as f64 * 100.0 / info.slots_in_epoch as f64,
            avg_slot_duration_ms,
            slots_remaining_in_epoch,
        }
    }

    pub fn estimated_epoch_duration_ms(&self) -> u64 {
        self.avg_slot_duration_ms * self.slots_in_epoch
    }
}

/// One entry of the cluster's recent performance samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerformanceSample {
    pub num_slots: u64,
    pub sample_period_secs: u64,
}

/// Mean slot duration over a window of recent performance samples. Empty
/// samples are skipped; with no usable sample the cluster's nominal slot
/// duration is used.
pub fn avg_slot_duration_ms(samples: &[PerformanceSample]) -> u64 {
    let mut sum_ms = 0u128;
    let mut sample_count = 0u128;
    for sample in samples.iter().filter(|sample| sample.num_slots > 0) {
        sum_ms += sample.sample_period_secs as u128 * 1_000 / sample.num_slots as u128;
        sample_count += 1;
    }
    if sample_count == 0 {
        DEFAULT_MS_PER_SLOT
    } else {
        (sum_ms / sample_count) as u64
    }
}

/// Where the cluster is inside the current epoch, from the point of view of
/// operations that move stake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpochPhase {
    /// start of the epoch, the cluster is still paying out stake rewards
    RewardsDistribution,
    /// close to the epoch boundary, stake operations may slip into the next epoch
    PreEpoch,
    Operable,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpochPhaseParams {
    /// stake accounts the cluster pays rewards to
    pub stake_account_count: u64,
    /// observed share of skipped slots
    pub skip_rate: f64,
    /// slots before the epoch end treated as pre-epoch
    pub warning_slots_before_epoch_end: u64,
}

impl Default for EpochPhaseParams {
    fn default() -> Self {
        Self {
            stake_account_count: 1_500_000,
            skip_rate: 0.1,
            warning_slots_before_epoch_end: 500,
        }
    }
}

/// Stake accounts credited per block while rewards are being distributed.
const REWARDED_ACCOUNTS_PER_BLOCK: f64 = 4096.0;

pub fn epoch_phase(
    info: &EpochInfo,
    rewards_distribution_active: bool,
    params: &EpochPhaseParams,
) -> EpochPhase {
    // slots needed to credit every stake account, corrected for skipped slots
    let rewards_distribution_slots = (params.stake_account_count as f64
        / REWARDED_ACCOUNTS_PER_BLOCK
        / (1.0 - params.skip_rate))
        .ceil() as u64;
    if rewards_distribution_active || info.slot_index <= rewards_distribution_slots {
        EpochPhase::RewardsDistribution
    } else if info.slot_index
        >= info
            .slots_in_epoch
            .saturating_sub(params.warning_slots_before_epoch_end)
    {
        EpochPhase::PreEpoch
    } else {
        EpochPhase::Operable
    }
}
