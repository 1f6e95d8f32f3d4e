use anchor_lang::prelude::*;

#[error_code]
pub enum MarinadeError {
    #[msg("Calculation failure")]
    CalculationFailure,

    #[msg("Account data is too small")]
    AccountDataTooSmall,

    #[msg("List index out of bounds")]
    ListIndexOutOfBounds,

    #[msg("Wrong validator list account discriminator")]
    InvalidValidatorListDiscriminator,

    #[msg("Wrong stake list account discriminator")]
    InvalidStakeListDiscriminator,

    #[msg("Invalid stake account data")]
    InvalidStakeAccountData,

    #[msg("Fee too high")]
    FeeTooHigh,

    #[msg("Required account not found")]
    AccountNotFound,
}
