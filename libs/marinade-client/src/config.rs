//! Deployment addresses of the protocol instance to work against. Built once
//! at startup and passed in explicitly; nothing in the crate reads the
//! process environment.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::pubkey;

/// Main (mainnet) instance of the protocol state.
pub const DEFAULT_MARINADE_STATE_ADDRESS: Pubkey =
    pubkey!("8szGkuLTAux9XMgZ2vtY39jVSowEcpBfFfD8hXSEqdGC");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarinadeConfig {
    pub marinade_program_id: Pubkey,
    pub marinade_state_address: Pubkey,
}

impl MarinadeConfig {
    pub fn new(marinade_program_id: Pubkey, marinade_state_address: Pubkey) -> Self {
        Self {
            marinade_program_id,
            marinade_state_address,
        }
    }
}

impl Default for MarinadeConfig {
    fn default() -> Self {
        Self {
            marinade_program_id: crate::ID,
            marinade_state_address: DEFAULT_MARINADE_STATE_ADDRESS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_deployed_instance() {
        let config = MarinadeConfig::default();
        assert_eq!(config.marinade_program_id, crate::ID);
        assert_eq!(
            config.marinade_state_address,
            DEFAULT_MARINADE_STATE_ADDRESS
        );
    }

    #[test]
    fn test_explicit_construction() {
        let program_id = Pubkey::new_unique();
        let state = Pubkey::new_unique();
        let config = MarinadeConfig::new(program_id, state);
        assert_eq!(config.marinade_program_id, program_id);
        assert_eq!(config.marinade_state_address, state);
    }
}
