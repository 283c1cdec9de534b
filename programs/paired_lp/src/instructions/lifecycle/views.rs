//! Read-only valuation views, answered through instruction return data.
//!
//! Spot valuation from current reserves: fine for reporting, easy to move
//! within a single transaction, never a price oracle.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount};

use crate::instructions::pool::PoolError;
use crate::math::CurveError;
use crate::state::{Agent, Pool};

#[derive(Accounts)]
pub struct ViewAgent<'info> {
    pub agent: Box<Account<'info, Agent>>,

    #[account(address = agent.want_account @ PoolError::AccountMismatch)]
    pub want_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = agent.lp_account @ PoolError::AccountMismatch)]
    pub lp_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = agent.pool @ PoolError::AccountMismatch)]
    pub pool: Box<Account<'info, Pool>>,

    #[account(address = pool.lp_mint @ PoolError::AccountMismatch)]
    pub lp_mint: Box<InterfaceAccount<'info, Mint>>,
}

impl<'info> ViewAgent<'info> {
    /// LP balance valued in want: `s * 2 * r_want / T`, 0 for an empty pool
    pub fn position_value_in_want(&self) -> u64 {
        self.agent
            .view(self.pool.reserve0, self.pool.reserve1, self.lp_mint.supply)
            .value_of(self.lp_account.amount)
    }

    /// Idle want plus the position's value
    pub fn total_assets(&self) -> Result<u64> {
        let total = self
            .want_account
            .amount
            .checked_add(self.position_value_in_want())
            .ok_or(CurveError::Overflow)?;
        Ok(total)
    }
}
