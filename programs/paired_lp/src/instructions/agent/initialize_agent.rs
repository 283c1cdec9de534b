//! Agent Creation
//!
//! Binds a new agent to a pool, a vault and an initial partner, and creates
//! the three token accounts the agent PDA owns (want, other, LP).
//!
//! Pairing two fresh agents takes two calls: the first agent is created with
//! the second's (derivable, not yet existing) address as partner, the second
//! against the first. Whenever the partner address already holds an agent,
//! its assets are checked here rather than at the first partner call.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::state::{Agent, Pool};

/// Event emitted when an agent is created
#[event]
pub struct AgentInitialized {
    pub agent: Pubkey,
    pub pool: Pubkey,
    pub want_mint: Pubkey,
    pub vault: Pubkey,
    pub partner: Pubkey,
}

#[derive(Accounts)]
#[instruction(id: u64, vault: Pubkey, partner: Pubkey)]
pub struct InitializeAgent<'info> {
    /// Becomes the agent's owner
    #[account(mut)]
    pub owner: Signer<'info>,

    pub pool: Box<Account<'info, Pool>>,

    pub want_mint: Box<InterfaceAccount<'info, Mint>>,

    pub other_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(address = pool.lp_mint @ InitializeAgentError::NotPoolAsset)]
    pub lp_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = owner,
        space = 8 + Agent::INIT_SPACE,
        seeds = [Agent::SEED, pool.key().as_ref(), want_mint.key().as_ref(), id.to_le_bytes().as_ref()],
        bump,
    )]
    pub agent: Box<Account<'info, Agent>>,

    #[account(
        init,
        payer = owner,
        associated_token::mint = want_mint,
        associated_token::authority = agent,
    )]
    pub want_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        payer = owner,
        associated_token::mint = other_mint,
        associated_token::authority = agent,
    )]
    pub other_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        payer = owner,
        associated_token::mint = lp_mint,
        associated_token::authority = agent,
    )]
    pub lp_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: pinned to `partner`; read as an agent only when this program
    /// owns it (see `Agent::load_if_initialized`)
    #[account(address = partner @ InitializeAgentError::PartnerAccountMismatch)]
    pub partner_agent: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> InitializeAgent<'info> {
    pub fn initialize_agent(
        &mut self,
        id: u64,
        vault: Pubkey,
        partner: Pubkey,
        bumps: &InitializeAgentBumps,
    ) -> Result<()> {
        let want_mint = self.want_mint.key();
        let other_mint = self.other_mint.key();
        let pool = self.pool.key();

        require_keys_neq!(want_mint, other_mint, InitializeAgentError::SameAsset);
        require!(
            self.pool.holds(&want_mint) && self.pool.holds(&other_mint),
            InitializeAgentError::NotPoolAsset
        );
        require_keys_neq!(partner, self.agent.key(), InitializeAgentError::SelfPartner);
        let existing = Agent::load_if_initialized(&self.partner_agent.to_account_info())?;
        check_partner_assets(existing.as_ref(), &pool, &want_mint, &other_mint)?;

        self.agent.set_inner(Agent {
            owner: self.owner.key(),
            vault,
            pool,
            want_mint,
            other_mint,
            want_account: self.want_account.key(),
            other_account: self.other_account.key(),
            lp_account: self.lp_account.key(),
            partner,
            want_is_token0: self.pool.token0_mint == want_mint,
            emergency_exit: false,
            settled_value: 0,
            id,
            bump: bumps.agent,
        });

        emit!(AgentInitialized {
            agent: self.agent.key(),
            pool,
            want_mint,
            vault,
            partner,
        });

        msg!("Agent initialized: {}", self.agent.key());
        msg!("Want: {}", want_mint);
        msg!("Partner: {}", partner);

        Ok(())
    }
}

/// An existing partner must manage the mirrored asset of the same pool.
/// `None` (nothing deployed at the partner address yet) passes.
pub fn check_partner_assets(
    partner_agent: Option<&Agent>,
    pool: &Pubkey,
    want_mint: &Pubkey,
    other_mint: &Pubkey,
) -> Result<()> {
    let Some(partner_agent) = partner_agent else {
        return Ok(());
    };

    require!(
        partner_agent.pool == *pool
            && partner_agent.want_mint == *other_mint
            && partner_agent.other_mint == *want_mint,
        InitializeAgentError::PartnerAssetMismatch
    );

    Ok(())
}

#[error_code]
pub enum InitializeAgentError {
    #[msg("Want and other must be different assets")]
    SameAsset,
    #[msg("Both assets must belong to the pool")]
    NotPoolAsset,
    #[msg("An agent cannot be its own partner")]
    SelfPartner,
    #[msg("Partner account does not match the partner address")]
    PartnerAccountMismatch,
    #[msg("Partner must manage the other asset of the same pool")]
    PartnerAssetMismatch,
}
