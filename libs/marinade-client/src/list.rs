use anchor_lang::prelude::*;

use crate::error::MarinadeError;

/// Descriptor of a dynamic array of fixed-size items stored in its own
/// account: an 8 byte discriminator followed by `count` items of `item_size`
/// bytes each. The descriptor lives inside the state account; the item bytes
/// live in the backing account it points to.
#[derive(Default, Clone, AnchorSerialize, AnchorDeserialize, Debug)]
pub struct List {
    pub account: Pubkey,
    pub item_size: u32,
    pub count: u32,
    // For chunked change account
    pub new_account: Pubkey,
    pub copied_count: u32,
}

impl List {
    pub fn bytes_for(item_size: u32, count: u32) -> u32 {
        8 + count * item_size
    }

    pub fn capacity_of(item_size: u32, account_len: usize) -> u32 {
        (account_len as u32 - 8) / item_size
    }

    pub fn item_size(&self) -> u32 {
        self.item_size
    }

    pub fn len(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_changing_account(&self) -> bool {
        self.new_account != Pubkey::default()
    }

    pub fn capacity(&self, account_len: usize) -> Result<u32> {
        Ok(u32::try_from(
            account_len
                .checked_sub(8)
                .ok_or(MarinadeError::AccountDataTooSmall)?,
        )
        .map_err(|_| error!(MarinadeError::CalculationFailure))?
        .checked_div(self.item_size())
        .unwrap_or(u32::MAX)) // for zst element (why you are using it in list?)
    }

    pub fn get<I: AnchorDeserialize>(&self, data: &[u8], index: u32, list_name: &str) -> Result<I> {
        if index >= self.len() {
            msg!(
                "list {} index out of bounds ({}/{})",
                list_name,
                index,
                self.len()
            );
            return err!(MarinadeError::ListIndexOutOfBounds);
        }
        let start = 8 + (index * self.item_size()) as usize;
        let end = start + self.item_size() as usize;
        if data.len() < end {
            msg!(
                "list {} item {} needs bytes [{}..{}) but account has only {}",
                list_name,
                index,
                start,
                end,
                data.len()
            );
            return err!(MarinadeError::AccountDataTooSmall);
        }
        I::deserialize(&mut &data[start..end]).map_err(|err| {
            Error::from(ProgramError::BorshIoError(err.to_string())).with_source(source!())
        })
    }

    /// Every item in list order.
    pub fn records<I: AnchorDeserialize>(&self, data: &[u8], list_name: &str) -> Result<Vec<I>> {
        (0..self.len())
            .map(|index| self.get(data, index, list_name))
            .collect()
    }
}
