#![cfg_attr(not(debug_assertions), deny(warnings))]

use anchor_lang::prelude::*;
use error::MarinadeError;
use std::{fmt::Display, str::FromStr};

pub mod calc;
pub mod checks;
pub mod config;
pub mod epoch;
pub mod error;
pub mod fetch;
pub mod liq_pool;
pub mod list;
pub mod stake_system;
pub mod stake_wrapper;
pub mod state;
pub mod ticket_account;
pub mod validator_system;

pub use state::State;

declare_id!("MarBmsSgKXdrN1egZf5sqe1TMai9K1rChYNDJgjq7aD");

pub const MAX_REWARD_FEE: u32 = 1_000; //basis points, 10% max reward fee

//-----------------------------------------------------
#[derive(
    Clone, Copy, Debug, Default, AnchorSerialize, AnchorDeserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Fee {
    pub basis_points: u32,
}

impl Display for Fee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.basis_points as f32 / 100.0)
    }
}

impl Fee {
    pub const fn from_basis_points(basis_points: u32) -> Self {
        Self { basis_points }
    }

    /// generic check, capped Fee
    pub fn check_max(&self, max_basis_points: u32) -> Result<()> {
        if self.basis_points > max_basis_points {
            err!(MarinadeError::FeeTooHigh)
        } else {
            Ok(())
        }
    }
    /// base check, Fee <= 100%
    pub fn check(&self) -> Result<()> {
        self.check_max(10_000)
    }

    pub fn apply(&self, lamports: u64) -> u64 {
        // LMT no error possible
        (lamports as u128 * self.basis_points as u128 / 10_000_u128) as u64
    }

    /// fee as a percentage (450 basis points => 4.5)
    pub fn as_percent(&self) -> f64 {
        self.basis_points as f64 / 100.0
    }
}

impl TryFrom<f64> for Fee {
    type Error = Error;

    fn try_from(n: f64) -> Result<Self> {
        let basis_points_i = (n * 100.0).floor() as i64; // 4.5% => 450 basis_points
        let basis_points =
            u32::try_from(basis_points_i).map_err(|_| MarinadeError::CalculationFailure)?;
        let fee = Fee::from_basis_points(basis_points);
        fee.check()?;
        Ok(fee)
    }
}

impl FromStr for Fee {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        f64::try_into(
            s.parse()
                .map_err(|_| error!(MarinadeError::CalculationFailure))?,
        )
    }
}
