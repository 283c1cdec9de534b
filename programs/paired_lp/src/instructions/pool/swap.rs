//! Public Swaps
//!
//! Anyone can trade against the pool. Trades are what move the reserve ratio
//! and create the impermanent-loss benefit the agents settle between them.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use super::*;

/// Event emitted on every public swap
#[event]
pub struct Swapped {
    pub pool: Pubkey,
    pub trader: Pubkey,
    pub zero_for_one: bool,
    pub amount_in: u64,
    pub amount_out: u64,
    pub reserve0: u64,
    pub reserve1: u64,
}

#[derive(Accounts)]
pub struct Swap<'info> {
    pub trader: Signer<'info>,

    pub pool: PoolAccounts<'info>,

    /// Trader's token0 account
    #[account(mut, token::authority = trader)]
    pub trader_token0: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Trader's token1 account
    #[account(mut, token::authority = trader)]
    pub trader_token1: Box<InterfaceAccount<'info, TokenAccount>>,
}

impl<'info> Swap<'info> {
    /// Sell `amount_in` of token0 (or token1) for the other asset
    pub fn swap(&mut self, amount_in: u64, min_amount_out: u64, zero_for_one: bool) -> Result<u64> {
        require_keys_eq!(
            self.trader_token0.mint,
            self.pool.state.token0_mint,
            PoolError::WrongMint
        );
        require_keys_eq!(
            self.trader_token1.mint,
            self.pool.state.token1_mint,
            PoolError::WrongMint
        );

        let (source, destination) = if zero_for_one {
            (&self.trader_token0, &self.trader_token1)
        } else {
            (&self.trader_token1, &self.trader_token0)
        };

        let amount_out = self.pool.swap(
            source,
            destination,
            self.trader.to_account_info(),
            &[],
            amount_in,
            min_amount_out,
            zero_for_one,
        )?;

        let (reserve0, reserve1) = self.pool.reserves();

        emit!(Swapped {
            pool: self.pool.state.key(),
            trader: self.trader.key(),
            zero_for_one,
            amount_in,
            amount_out,
            reserve0,
            reserve1,
        });

        Ok(amount_out)
    }
}
