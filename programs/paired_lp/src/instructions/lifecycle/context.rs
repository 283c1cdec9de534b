//! Vault-driven lifecycle context
//!
//! Report, enter and exit all run on the same accounts as the partner
//! protocol, with the agent being driven in the caller position and its
//! vault as signer.

use anchor_lang::prelude::*;

use crate::instructions::partner::*;
use crate::instructions::pool::PoolError;

#[derive(Accounts)]
pub struct Lifecycle<'info> {
    /// The agent's vault
    pub vault: Signer<'info>,

    /// `pair.caller` is the agent being driven, `pair.callee` its partner
    pub pair: Pairing<'info>,
}

impl<'info> Lifecycle<'info> {
    pub fn authorize_vault(&self) -> Result<()> {
        require_keys_eq!(
            self.vault.key(),
            self.pair.caller.vault,
            LifecycleError::NotVault
        );
        require_keys_eq!(
            self.pair.caller.pool,
            self.pair.pool.state.key(),
            PoolError::AccountMismatch
        );
        Ok(())
    }

    /// Collect whatever the partner owes before looking at idle funds.
    /// A broken partner edge skips the rebalance instead of blocking the
    /// vault from its own funds.
    pub fn settle_with_partner(&mut self) -> Result<u64> {
        if !self.pair.is_paired() {
            msg!("Partner edge not symmetric, rebalance skipped");
            return Ok(0);
        }

        self.pair.rebalance()
    }
}

#[error_code]
pub enum LifecycleError {
    #[msg("Signer is not the agent's vault")]
    NotVault,
    #[msg("Successor must be a different agent with the same pool, want and vault")]
    InvalidSuccessor,
    #[msg("Destination must be a want account owned by the vault")]
    WrongDestination,
}
