//! Migration
//!
//! Hands the whole position (idle want, idle other, LP) to a successor agent
//! and moves the partner edge with it, so that afterwards the partner and the
//! successor point at each other and the old agent is out of the pair.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use super::LifecycleError;
use crate::instructions::pool::{transfer_tokens, PoolError};
use crate::math::carry_settled;
use crate::state::{check_pairing, Agent, Pool};

/// Event emitted when an agent hands its position to a successor
#[event]
pub struct AgentMigrated {
    pub agent: Pubkey,
    pub successor: Pubkey,
    pub partner: Pubkey,
    pub want_moved: u64,
    pub other_moved: u64,
    pub lp_moved: u64,
    pub settled_value: u64,
}

#[derive(Accounts)]
pub struct PrepareMigration<'info> {
    /// Vault of both the agent and its successor
    pub vault: Signer<'info>,

    #[account(mut)]
    pub agent: Box<Account<'info, Agent>>,

    #[account(mut, address = agent.want_account @ PoolError::AccountMismatch)]
    pub agent_want: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = agent.other_account @ PoolError::AccountMismatch)]
    pub agent_other: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = agent.lp_account @ PoolError::AccountMismatch)]
    pub agent_lp: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub successor: Box<Account<'info, Agent>>,

    #[account(mut, address = successor.want_account @ PoolError::AccountMismatch)]
    pub successor_want: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = successor.other_account @ PoolError::AccountMismatch)]
    pub successor_other: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = successor.lp_account @ PoolError::AccountMismatch)]
    pub successor_lp: Box<InterfaceAccount<'info, TokenAccount>>,

    /// The agent's current partner, re-pointed at the successor
    #[account(mut)]
    pub partner: Box<Account<'info, Agent>>,

    #[account(address = agent.pool @ PoolError::AccountMismatch)]
    pub pool: Box<Account<'info, Pool>>,

    #[account(address = agent.want_mint @ PoolError::WrongMint)]
    pub want_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(address = agent.other_mint @ PoolError::WrongMint)]
    pub other_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(address = pool.lp_mint @ PoolError::WrongMint)]
    pub lp_mint: Box<InterfaceAccount<'info, Mint>>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> PrepareMigration<'info> {
    pub fn prepare_migration(&mut self) -> Result<()> {
        require_keys_eq!(self.vault.key(), self.agent.vault, LifecycleError::NotVault);

        let agent_key = self.agent.key();
        let successor_key = self.successor.key();
        let partner_key = self.partner.key();

        require_keys_neq!(agent_key, successor_key, LifecycleError::InvalidSuccessor);
        require_keys_neq!(partner_key, successor_key, LifecycleError::InvalidSuccessor);
        require!(
            self.successor.pool == self.agent.pool
                && self.successor.want_mint == self.agent.want_mint
                && self.successor.other_mint == self.agent.other_mint
                && self.successor.vault == self.agent.vault,
            LifecycleError::InvalidSuccessor
        );
        check_pairing(&agent_key, &self.agent, &partner_key, &self.partner)?;

        let agent_signer = self.agent.signer();
        let agent_seeds = agent_signer.seeds();
        let signer_seeds = [&agent_seeds[..]];

        let want_moved = self.agent_want.amount;
        let other_moved = self.agent_other.amount;
        let lp_moved = self.agent_lp.amount;

        transfer_tokens(
            &self.token_program,
            &self.agent_want,
            &self.successor_want,
            &self.want_mint,
            self.agent.to_account_info(),
            &signer_seeds,
            want_moved,
        )?;
        transfer_tokens(
            &self.token_program,
            &self.agent_other,
            &self.successor_other,
            &self.other_mint,
            self.agent.to_account_info(),
            &signer_seeds,
            other_moved,
        )?;
        transfer_tokens(
            &self.token_program,
            &self.agent_lp,
            &self.successor_lp,
            &self.lp_mint,
            self.agent.to_account_info(),
            &signer_seeds,
            lp_moved,
        )?;

        // The position's high-water mark travels with the LP
        let settled_value = carry_settled(self.successor.settled_value, self.agent.settled_value);
        self.successor.settled_value = settled_value;
        self.agent.settled_value = 0;

        self.partner.migrate_partner(&agent_key, successor_key)?;
        self.successor.partner = partner_key;

        emit!(AgentMigrated {
            agent: agent_key,
            successor: successor_key,
            partner: partner_key,
            want_moved,
            other_moved,
            lp_moved,
            settled_value,
        });

        msg!("Migrated {} -> {}", agent_key, successor_key);
        msg!("Partner {} now paired with successor", partner_key);

        Ok(())
    }
}
