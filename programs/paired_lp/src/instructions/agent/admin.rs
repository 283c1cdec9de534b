//! Agent Administration
//!
//! Owner-side controls. `set_partner` is a unilateral override of one end of
//! the partner edge; until the other end agrees, partner flows between the
//! two agents are refused.

use anchor_lang::prelude::*;

use super::check_partner_assets;
use crate::state::{Agent, AgentError};

/// Event emitted when the owner re-points an agent
#[event]
pub struct PartnerSet {
    pub agent: Pubkey,
    pub previous_partner: Pubkey,
    pub partner: Pubkey,
}

/// Event emitted when an agent enters emergency exit
#[event]
pub struct EmergencyExitEnabled {
    pub agent: Pubkey,
    pub authority: Pubkey,
}

#[derive(Accounts)]
#[instruction(new_partner: Pubkey)]
pub struct SetPartner<'info> {
    pub owner: Signer<'info>,

    #[account(mut, has_one = owner @ AgentError::NotAuthority)]
    pub agent: Box<Account<'info, Agent>>,

    /// CHECK: pinned to `new_partner`; read as an agent only when this
    /// program owns it
    #[account(address = new_partner @ AgentError::InvalidPartner)]
    pub partner_agent: UncheckedAccount<'info>,
}

impl<'info> SetPartner<'info> {
    pub fn set_partner(&mut self, new_partner: Pubkey) -> Result<()> {
        require_keys_neq!(new_partner, self.agent.key(), AgentError::SelfPartner);
        let existing = Agent::load_if_initialized(&self.partner_agent.to_account_info())?;
        check_partner_assets(
            existing.as_ref(),
            &self.agent.pool,
            &self.agent.want_mint,
            &self.agent.other_mint,
        )?;

        let previous_partner = self.agent.partner;
        self.agent.partner = new_partner;

        emit!(PartnerSet {
            agent: self.agent.key(),
            previous_partner,
            partner: new_partner,
        });

        msg!("Partner set: {} -> {}", previous_partner, new_partner);

        Ok(())
    }
}

#[derive(Accounts)]
pub struct SetEmergencyExit<'info> {
    /// Owner or vault of the agent
    pub authority: Signer<'info>,

    #[account(mut)]
    pub agent: Box<Account<'info, Agent>>,
}

impl<'info> SetEmergencyExit<'info> {
    /// One way: there is no instruction that clears the flag
    pub fn set_emergency_exit(&mut self) -> Result<()> {
        require!(
            self.agent.is_authority(&self.authority.key()),
            AgentError::NotAuthority
        );

        if self.agent.emergency_exit {
            msg!("Emergency exit already active");
            return Ok(());
        }

        self.agent.emergency_exit = true;

        emit!(EmergencyExitEnabled {
            agent: self.agent.key(),
            authority: self.authority.key(),
        });

        msg!("Emergency exit enabled for {}", self.agent.key());

        Ok(())
    }
}
