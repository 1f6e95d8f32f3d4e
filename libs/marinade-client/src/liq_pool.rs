use crate::{
    calc::{proportional, unstake_now_fee_bp},
    checks::check_address,
    Fee,
};
use anchor_lang::prelude::*;

#[derive(Clone, AnchorSerialize, AnchorDeserialize, Debug)]
pub struct LiqPool {
    pub lp_mint: Pubkey,
    pub lp_mint_authority_bump_seed: u8,
    pub sol_leg_bump_seed: u8,
    pub msol_leg_authority_bump_seed: u8,
    pub msol_leg: Pubkey,

    //The next 3 values define the SOL/mSOL Liquidity pool fee curve params
    // We assume this pool is always UNBALANCED, there should be more SOL than mSOL 99% of the time
    ///Liquidity target. If the Liquidity reach this amount, the fee reaches lp_min_discount_fee
    pub lp_liquidity_target: u64, // 10_000 SOL initially
    /// Liquidity pool max fee
    pub lp_max_fee: Fee, //3% initially
    /// SOL/mSOL Liquidity pool min fee
    pub lp_min_fee: Fee, //0.3% initially
    /// Treasury cut
    pub treasury_cut: Fee, //2500 => 25% how much of the Liquid unstake fee goes to treasury_msol_account

    pub lp_supply: u64, // virtual lp token supply. May be > real supply because of burning tokens. Use UpdateLiqPool to align it with real value
    pub lent_from_sol_leg: u64,
    pub liquidity_sol_cap: u64,
}

impl LiqPool {
    pub const LP_MINT_AUTHORITY_SEED: &'static [u8] = b"liq_mint";
    pub const SOL_LEG_SEED: &'static [u8] = b"liq_sol";
    pub const MSOL_LEG_AUTHORITY_SEED: &'static [u8] = b"liq_st_sol_authority";
    pub const MSOL_LEG_SEED: &'static str = "liq_st_sol";

    pub fn find_lp_mint_authority(program_id: &Pubkey, state: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[&state.to_bytes()[..32], Self::LP_MINT_AUTHORITY_SEED],
            program_id,
        )
    }

    pub fn find_sol_leg_address(program_id: &Pubkey, state: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[&state.to_bytes()[..32], Self::SOL_LEG_SEED], program_id)
    }

    pub fn find_msol_leg_authority(program_id: &Pubkey, state: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[&state.to_bytes()[..32], Self::MSOL_LEG_AUTHORITY_SEED],
            program_id,
        )
    }

    pub fn default_msol_leg_address(state: &Pubkey) -> Pubkey {
        Pubkey::create_with_seed(state, Self::MSOL_LEG_SEED, &spl_token::ID).unwrap()
    }

    /// lp mint authority from the bump seed recorded on chain
    pub fn lp_mint_authority(&self, program_id: &Pubkey, state: &Pubkey) -> Pubkey {
        Pubkey::create_program_address(
            &[
                &state.to_bytes()[..32],
                Self::LP_MINT_AUTHORITY_SEED,
                &[self.lp_mint_authority_bump_seed],
            ],
            program_id,
        )
        .unwrap()
    }

    pub fn sol_leg_address(&self, program_id: &Pubkey, state: &Pubkey) -> Pubkey {
        Pubkey::create_program_address(
            &[
                &state.to_bytes()[..32],
                Self::SOL_LEG_SEED,
                &[self.sol_leg_bump_seed],
            ],
            program_id,
        )
        .unwrap()
    }

    pub fn msol_leg_authority(&self, program_id: &Pubkey, state: &Pubkey) -> Pubkey {
        Pubkey::create_program_address(
            &[
                &state.to_bytes()[..32],
                Self::MSOL_LEG_AUTHORITY_SEED,
                &[self.msol_leg_authority_bump_seed],
            ],
            program_id,
        )
        .unwrap()
    }

    pub fn check_lp_mint(&self, lp_mint: &Pubkey) -> Result<()> {
        check_address(lp_mint, &self.lp_mint, "lp_mint")
    }

    pub fn check_liq_pool_msol_leg(&self, liq_pool_msol_leg: &Pubkey) -> Result<()> {
        check_address(liq_pool_msol_leg, &self.msol_leg, "liq_pool_msol_leg")
    }

    pub fn delta(&self) -> u32 {
        self.lp_max_fee
            .basis_points
            .saturating_sub(self.lp_min_fee.basis_points)
    }

    ///compute a linear fee based on liquidity amount, it goes from fee(0)=max -> fee(x>=target)=min
    pub fn linear_fee(&self, lamports: u64) -> Fee {
        if lamports >= self.lp_liquidity_target {
            self.lp_min_fee
        } else {
            Fee {
                basis_points: self.lp_max_fee.basis_points
                    - proportional(self.delta() as u64, lamports, self.lp_liquidity_target).unwrap()
                        as u32,
            }
        }
    }

    /// fee charged for taking `lamports_to_obtain` out of the pool right now,
    /// given `lamports_available` of liquidity
    pub fn unstake_now_fee(&self, lamports_available: u64, lamports_to_obtain: u64) -> Fee {
        Fee::from_basis_points(unstake_now_fee_bp(
            self.lp_min_fee.basis_points,
            self.lp_max_fee.basis_points,
            self.lp_liquidity_target,
            lamports_available,
            lamports_to_obtain,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_pool(min_bp: u32, max_bp: u32, target: u64) -> LiqPool {
        LiqPool {
            lp_mint: Pubkey::new_unique(),
            lp_mint_authority_bump_seed: 0,
            sol_leg_bump_seed: 0,
            msol_leg_authority_bump_seed: 0,
            msol_leg: Pubkey::new_unique(),
            lp_liquidity_target: target,
            lp_max_fee: Fee::from_basis_points(max_bp),
            lp_min_fee: Fee::from_basis_points(min_bp),
            treasury_cut: Fee::from_basis_points(2_500),
            lp_supply: 0,
            lent_from_sol_leg: 0,
            liquidity_sol_cap: u64::MAX,
        }
    }

    #[test]
    fn test_linear_fee() {
        let pool = test_pool(30, 300, 100);
        assert_eq!(pool.linear_fee(0), Fee::from_basis_points(300));
        assert_eq!(pool.linear_fee(100), Fee::from_basis_points(30));
        assert_eq!(pool.linear_fee(1_000), Fee::from_basis_points(30));
        assert_eq!(pool.linear_fee(80), Fee::from_basis_points(84));
    }

    #[test]
    fn test_unstake_now_fee() {
        let pool = test_pool(30, 300, 100);
        assert_eq!(pool.unstake_now_fee(50, 60), Fee::from_basis_points(300));
        assert_eq!(pool.unstake_now_fee(150, 20), Fee::from_basis_points(30));
        assert_eq!(pool.unstake_now_fee(150, 70), Fee::from_basis_points(84));
    }

    #[test]
    fn test_authorities_round_trip() {
        let program_id = crate::ID;
        let state = Pubkey::new_unique();
        let (lp_mint_authority, lp_bump) = LiqPool::find_lp_mint_authority(&program_id, &state);
        let (sol_leg, sol_bump) = LiqPool::find_sol_leg_address(&program_id, &state);
        let (msol_leg_authority, msol_bump) = LiqPool::find_msol_leg_authority(&program_id, &state);

        let mut pool = test_pool(30, 300, 100);
        pool.lp_mint_authority_bump_seed = lp_bump;
        pool.sol_leg_bump_seed = sol_bump;
        pool.msol_leg_authority_bump_seed = msol_bump;

        assert_eq!(pool.lp_mint_authority(&program_id, &state), lp_mint_authority);
        assert_eq!(pool.sol_leg_address(&program_id, &state), sol_leg);
        assert_eq!(pool.msol_leg_authority(&program_id, &state), msol_leg_authority);
    }
}
