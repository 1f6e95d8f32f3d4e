//! Common calculations

use crate::error::MarinadeError;
use anchor_lang::prelude::*;

/// calculate amount*numerator/denominator
/// as value  = shares * share_price where share_price=total_value/total_shares
/// or shares = amount_value / share_price where share_price=total_value/total_shares
///     => shares = amount_value * 1/share_price where 1/share_price=total_shares/total_value
///
/// denominator == 0 returns amount unchanged. This is a deliberate degenerate-input
/// contract (pools with no shares minted yet), not error suppression; do not rely on
/// it outside this function.
pub fn proportional(amount: u64, numerator: u64, denominator: u64) -> Result<u64> {
    if denominator == 0 {
        return Ok(amount);
    }
    u64::try_from((amount as u128) * (numerator as u128) / (denominator as u128))
        .map_err(|_| error!(MarinadeError::CalculationFailure))
}

#[inline] //alias for proportional
pub fn value_from_shares(shares: u64, total_value: u64, total_shares: u64) -> Result<u64> {
    proportional(shares, total_value, total_shares)
}

pub fn shares_from_value(value: u64, total_value: u64, total_shares: u64) -> Result<u64> {
    if total_shares == 0 {
        //no shares minted yet / First mint
        Ok(value)
    } else {
        proportional(value, total_shares, total_value)
    }
}

/// Instant-unstake fee in basis points: a linear curve over the liquidity left
/// in the pool after the operation, fee(0)=max_fee_bp -> fee(>=liquidity_target)=min_fee_bp.
/// Asking for the whole pool or more charges max_fee_bp.
/// The discount is floored, so the resulting fee never falls below the exact
/// linear value. min_fee_bp <= max_fee_bp is a caller invariant.
pub fn unstake_now_fee_bp(
    min_fee_bp: u32,
    max_fee_bp: u32,
    liquidity_target: u64,
    lamports_available: u64,
    lamports_to_obtain: u64,
) -> u32 {
    if lamports_to_obtain >= lamports_available {
        return max_fee_bp;
    }
    let lamports_after = lamports_available - lamports_to_obtain;
    if lamports_after >= liquidity_target {
        min_fee_bp
    } else {
        // LMT no error possible, the result is <= max_fee_bp - min_fee_bp
        max_fee_bp
            - proportional(
                (max_fee_bp - min_fee_bp) as u64,
                lamports_after,
                liquidity_target,
            )
            .unwrap() as u32
    }
}
