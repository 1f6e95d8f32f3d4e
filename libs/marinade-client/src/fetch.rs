//! Batched reads of per-record detail accounts.
//!
//! The list accounts point at hundreds of individual stake accounts; the
//! remote read API caps a single multiple-accounts request, so lookups run in
//! chunks. The actual I/O stays with the caller, only the chunking and
//! order-preserving reassembly live here.

use anchor_lang::prelude::*;

use crate::error::MarinadeError;

/// Most accounts a single multiple-accounts read may request.
pub const MAX_FETCH_BATCH: usize = 100;

/// Drive a batched lookup over `keys` in request-sized chunks. `result[i]`
/// belongs to `keys[i]` regardless of how the batches were executed; `fetch`
/// must return exactly one entry per requested key. Lookup errors propagate
/// unchanged, nothing is retried.
pub fn fetch_in_batches<K, V, E, F>(keys: &[K], mut fetch: F) -> std::result::Result<Vec<V>, E>
where
    F: FnMut(&[K]) -> std::result::Result<Vec<V>, E>,
{
    let mut result = Vec::with_capacity(keys.len());
    for batch_keys in keys.chunks(MAX_FETCH_BATCH) {
        let batch = fetch(batch_keys)?;
        assert_eq!(
            batch.len(),
            batch_keys.len(),
            "batch lookup must return one entry per key"
        );
        result.extend(batch);
    }
    Ok(result)
}

/// A backing account the protocol needs may be absent only because of a wrong
/// address or a broken node; fail fast instead of substituting defaults.
pub fn require_account<T>(account: Option<T>, address: &Pubkey, field_name: &str) -> Result<T> {
    account.ok_or_else(|| {
        msg!("Account {} ({}) not found", address, field_name);
        error!(MarinadeError::AccountNotFound).with_account_name(field_name)
    })
}
