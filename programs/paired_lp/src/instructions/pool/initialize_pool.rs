//! Pool Creation
//!
//! Creates the constant-product pool the two agents share: the pool PDA, its
//! LP mint and one reserve account per asset.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use super::PoolError;
use crate::state::Pool;

/// Event emitted when a pool is created
#[event]
pub struct PoolInitialized {
    pub pool: Pubkey,
    pub token0_mint: Pubkey,
    pub token1_mint: Pubkey,
    pub lp_mint: Pubkey,
    pub fee_bps: u16,
}

/// Accounts required to create a pool
#[derive(Accounts)]
pub struct InitializePool<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    pub token0_mint: Box<InterfaceAccount<'info, Mint>>,

    pub token1_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = payer,
        space = 8 + Pool::INIT_SPACE,
        seeds = [Pool::SEED, token0_mint.key().as_ref(), token1_mint.key().as_ref()],
        bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        init,
        payer = payer,
        seeds = [Pool::LP_MINT_SEED, pool.key().as_ref()],
        bump,
        mint::decimals = Pool::LP_DECIMALS,
        mint::authority = pool,
    )]
    pub lp_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = payer,
        associated_token::mint = token0_mint,
        associated_token::authority = pool,
    )]
    pub vault0: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        payer = payer,
        associated_token::mint = token1_mint,
        associated_token::authority = pool,
    )]
    pub vault1: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> InitializePool<'info> {
    pub fn initialize_pool(&mut self, fee_bps: u16, bumps: &InitializePoolBumps) -> Result<()> {
        require_keys_neq!(
            self.token0_mint.key(),
            self.token1_mint.key(),
            PoolError::IdenticalMints
        );
        require!(fee_bps <= Pool::MAX_FEE_BPS, PoolError::FeeTooHigh);

        self.pool.set_inner(Pool {
            token0_mint: self.token0_mint.key(),
            token1_mint: self.token1_mint.key(),
            lp_mint: self.lp_mint.key(),
            vault0: self.vault0.key(),
            vault1: self.vault1.key(),
            reserve0: 0,
            reserve1: 0,
            fee_bps,
            bump: bumps.pool,
        });

        emit!(PoolInitialized {
            pool: self.pool.key(),
            token0_mint: self.token0_mint.key(),
            token1_mint: self.token1_mint.key(),
            lp_mint: self.lp_mint.key(),
            fee_bps,
        });

        msg!("Pool initialized: {}", self.pool.key());
        msg!("Fee: {} bps", fee_bps);

        Ok(())
    }
}
