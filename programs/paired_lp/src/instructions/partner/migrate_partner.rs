//! Partner Migration
//!
//! When one side of the pair is replaced, the side being replaced tells its
//! partner where its successor lives. Only the current partner may do this;
//! the owner's `set_partner` is the separate administrative override.

use anchor_lang::prelude::*;

use crate::state::{Agent, AgentError};

/// Event emitted when a partner reference is moved by the partner itself
#[event]
pub struct PartnerMigrated {
    pub agent: Pubkey,
    pub previous_partner: Pubkey,
    pub new_partner: Pubkey,
}

#[derive(Accounts)]
pub struct MigratePartner<'info> {
    /// Vault or owner of the calling agent
    pub authority: Signer<'info>,

    /// The agent being replaced (the callee's current partner)
    pub caller: Box<Account<'info, Agent>>,

    /// The agent whose partner reference moves
    #[account(mut)]
    pub callee: Box<Account<'info, Agent>>,
}

impl<'info> MigratePartner<'info> {
    pub fn migrate_partner(&mut self, new_partner: Pubkey) -> Result<()> {
        require!(
            self.caller.is_authority(&self.authority.key()),
            AgentError::NotAuthority
        );

        let caller = self.caller.key();
        self.callee.migrate_partner(&caller, new_partner)?;

        emit!(PartnerMigrated {
            agent: self.callee.key(),
            previous_partner: caller,
            new_partner,
        });

        msg!("Partner of {} migrated to {}", self.callee.key(), new_partner);

        Ok(())
    }
}
