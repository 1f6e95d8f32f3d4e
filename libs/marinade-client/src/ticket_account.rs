use anchor_lang::prelude::*;

use crate::epoch::ProcessedEpochInfo;

/// Extra wait after the epoch boundary before a due ticket actually clears:
/// the crank needs time to move SOL from deactivated stake accounts into the
/// reserve before claims succeed.
pub const EXTRA_WAIT_MILLISECONDS: i64 = 45 * 60 * 1_000;

#[account]
#[derive(Debug)]
pub struct TicketAccountData {
    pub state_address: Pubkey, // instance of marinade state this ticket belongs to
    pub beneficiary: Pubkey,   // main account where to send SOL when claimed
    pub lamports_amount: u64,  // amount this ticket is worth
    pub created_epoch: u64, // epoch when this acc was created (epoch when delayed-unstake was requested)
}

/// Claimability of a delayed-unstake ticket derived from the current epoch
/// timing. Computed on read, never stored on chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TicketDateInfo {
    pub ticket_due: bool,
    /// estimated wall-clock time the ticket becomes claimable, unix milliseconds
    pub ticket_due_date_ms: i64,
}

/// A ticket is due once a full epoch boundary has passed since it was created.
/// The due date estimate anchors on the start of the current epoch
/// (`now - ms_elapsed`) and steps whole estimated epochs from there.
pub fn ticket_date_info(
    epoch_info: &ProcessedEpochInfo,
    created_epoch: u64,
    now_ms: i64,
) -> TicketDateInfo {
    let ticket_due = created_epoch < epoch_info.epoch;
    let epoch_start_ms = now_ms - epoch_info.ms_elapsed as i64;
    let estimated_epoch_duration_ms = epoch_info.estimated_epoch_duration_ms() as i64;
    let ticket_due_date_ms = if ticket_due {
        // already waited (epoch - created_epoch) boundaries; every epoch beyond
        // the first moves the date back by one estimated epoch
        epoch_start_ms + EXTRA_WAIT_MILLISECONDS
            - estimated_epoch_duration_ms * (epoch_info.epoch - created_epoch - 1) as i64
    } else {
        // the boundary (or boundaries, when the order got deferred) is still ahead
        epoch_start_ms
            + estimated_epoch_duration_ms * (created_epoch - epoch_info.epoch + 1) as i64
            + EXTRA_WAIT_MILLISECONDS
    };
    TicketDateInfo {
        ticket_due,
        ticket_due_date_ms,
    }
}

/// "If the unstake were ordered right now, when would it clear?" Orders placed
/// once the stake-delta window of the current epoch has started are deferred
/// to the next epoch and wait one epoch longer.
pub fn estimate_ticket_date_info(
    epoch_info: &ProcessedEpochInfo,
    now_ms: i64,
    slots_for_stake_delta: u64,
) -> TicketDateInfo {
    let created_epoch = epoch_info.epoch
        + if epoch_info.slots_remaining_in_epoch > slots_for_stake_delta {
            0
        } else {
            1
        };
    ticket_date_info(epoch_info, created_epoch, now_ms)
}

impl TicketAccountData {
    pub fn date_info(&self, epoch_info: &ProcessedEpochInfo, now_ms: i64) -> TicketDateInfo {
        ticket_date_info(epoch_info, self.created_epoch, now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Chain snapshot taken during epoch 318.
    fn snapshot() -> ProcessedEpochInfo {
        ProcessedEpochInfo {
            epoch: 318,
            slot_index: 129_844,
            slots_in_epoch: 432_000,
            absolute_slot: 137_505_844,
            ms_elapsed: 95_225_546,
            ms_until_epoch_end: 221_596_455,
            epoch_progress: 30.06,
            avg_slot_duration_ms: 733,
            slots_remaining_in_epoch: 302_156,
        }
    }

    const NOW_MS: i64 = 1_655_201_767_918;

    #[test]
    fn test_ticket_created_this_epoch() {
        // 2022-06-17T00:31:38.372Z
        let info = ticket_date_info(&snapshot(), 318, NOW_MS);
        assert!(!info.ticket_due);
        assert_eq!(info.ticket_due_date_ms, 1_655_425_898_372);
    }

    #[test]
    fn test_ticket_created_previous_epoch() {
        // 2022-06-13T08:34:02.372Z
        let info = ticket_date_info(&snapshot(), 317, NOW_MS);
        assert!(info.ticket_due);
        assert_eq!(info.ticket_due_date_ms, 1_655_109_242_372);
    }

    #[test]
    fn test_ticket_created_three_epochs_ago() {
        // 2022-06-06T00:38:50.372Z
        let info = ticket_date_info(&snapshot(), 315, NOW_MS);
        assert!(info.ticket_due);
        assert_eq!(info.ticket_due_date_ms, 1_654_475_930_372);
    }

    #[test]
    fn test_estimate_outside_stake_delta_window() {
        // 302156 slots remain, far from the window: order lands in this epoch
        let estimated = estimate_ticket_date_info(&snapshot(), NOW_MS, 3_000);
        assert!(!estimated.ticket_due);
        assert_eq!(estimated.ticket_due_date_ms, 1_655_425_898_372);
    }

    #[test]
    fn test_estimate_inside_stake_delta_window() {
        // window larger than the remaining slots: order defers one more epoch
        let estimated = estimate_ticket_date_info(&snapshot(), NOW_MS, 400_000);
        assert!(!estimated.ticket_due);
        assert_eq!(
            estimated.ticket_due_date_ms,
            1_655_425_898_372 + 733 * 432_000
        );
    }

    #[test]
    fn test_ticket_account_round_trip() -> Result<()> {
        let ticket = TicketAccountData {
            state_address: Pubkey::new_unique(),
            beneficiary: Pubkey::new_unique(),
            lamports_amount: 1_500_000_000,
            created_epoch: 317,
        };
        let mut data: Vec<u8> = Vec::new();
        ticket.try_serialize(&mut data)?;

        let decoded = TicketAccountData::try_deserialize(&mut data.as_slice())?;
        assert_eq!(decoded.state_address, ticket.state_address);
        assert_eq!(decoded.beneficiary, ticket.beneficiary);
        assert_eq!(decoded.lamports_amount, ticket.lamports_amount);
        assert_eq!(decoded.created_epoch, ticket.created_epoch);

        let info = decoded.date_info(&snapshot(), NOW_MS);
        assert!(info.ticket_due);

        // wrong discriminator is a decode failure, not a zeroed ticket
        data[3] ^= 0xff;
        assert!(TicketAccountData::try_deserialize(&mut data.as_slice()).is_err());
        Ok(())
    }
}
