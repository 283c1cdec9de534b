//! Direct partner calls
//!
//! `rebalance` and `provide_and_split` sent straight to the program by an
//! authority of the calling agent, outside any vault-driven lifecycle step.

use anchor_lang::prelude::*;

use super::*;
use crate::state::AgentError;

#[derive(Accounts)]
pub struct PartnerCall<'info> {
    /// Vault or owner of the calling agent
    pub authority: Signer<'info>,

    pub pair: Pairing<'info>,
}

impl<'info> PartnerCall<'info> {
    fn authorize(&self) -> Result<()> {
        require!(
            self.pair.caller.is_authority(&self.authority.key()),
            AgentError::NotAuthority
        );
        Ok(())
    }

    pub fn rebalance(&mut self) -> Result<u64> {
        self.authorize()?;
        self.pair.rebalance()
    }

    pub fn provide_and_split(&mut self, max_other: u64) -> Result<u64> {
        self.authorize()?;
        self.pair.provide_and_split(max_other)
    }
}
