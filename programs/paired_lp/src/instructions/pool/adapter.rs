//! Pool Adapter
//!
//! Everything the agents need from the pool goes through [`PoolAccounts`]:
//! reserves, LP supply, deposit (mint), withdraw (burn) and swap. The adapter
//! moves tokens and keeps the tracked reserves in step; it holds no strategy
//! logic of its own.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    burn, mint_to, transfer_checked, Burn, Mint, MintTo, TokenAccount, TokenInterface,
    TransferChecked,
};

use crate::math::{amounts_for_burn, liquidity_for_deposit, swap_output, CurveError, Deposit, ReserveView};
use crate::state::Pool;

/// Pool accounts shared by every instruction that touches liquidity
#[derive(Accounts)]
pub struct PoolAccounts<'info> {
    /// Pool state
    #[account(mut)]
    pub state: Box<Account<'info, Pool>>,

    /// LP mint
    #[account(mut, address = state.lp_mint @ PoolError::AccountMismatch)]
    pub lp_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(address = state.token0_mint @ PoolError::AccountMismatch)]
    pub token0_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(address = state.token1_mint @ PoolError::AccountMismatch)]
    pub token1_mint: Box<InterfaceAccount<'info, Mint>>,

    /// token0 reserve
    #[account(mut, address = state.vault0 @ PoolError::AccountMismatch)]
    pub vault0: Box<InterfaceAccount<'info, TokenAccount>>,

    /// token1 reserve
    #[account(mut, address = state.vault1 @ PoolError::AccountMismatch)]
    pub vault1: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
}

/// Token accounts and signing authority of whoever deposits or withdraws
pub struct Provider<'a, 'info> {
    pub token0: &'a InterfaceAccount<'info, TokenAccount>,
    pub token1: &'a InterfaceAccount<'info, TokenAccount>,
    pub lp: &'a InterfaceAccount<'info, TokenAccount>,
    pub authority: AccountInfo<'info>,
    pub signer_seeds: &'a [&'a [&'a [u8]]],
}

impl<'a, 'info> Provider<'a, 'info> {
    /// Build a provider from an agent's want/other accounts
    pub fn new(
        want: &'a InterfaceAccount<'info, TokenAccount>,
        other: &'a InterfaceAccount<'info, TokenAccount>,
        lp: &'a InterfaceAccount<'info, TokenAccount>,
        authority: AccountInfo<'info>,
        want_is_token0: bool,
        signer_seeds: &'a [&'a [&'a [u8]]],
    ) -> Self {
        let (token0, token1) = if want_is_token0 {
            (want, other)
        } else {
            (other, want)
        };

        Self {
            token0,
            token1,
            lp,
            authority,
            signer_seeds,
        }
    }
}

impl<'info> PoolAccounts<'info> {
    pub fn total_supply(&self) -> u64 {
        self.lp_mint.supply
    }

    pub fn reserves(&self) -> (u64, u64) {
        (self.state.reserve0, self.state.reserve1)
    }

    /// Reserves and supply oriented to an agent's want
    pub fn view(&self, want_is_token0: bool) -> ReserveView {
        let (reserve0, reserve1) = self.reserves();
        ReserveView::oriented(reserve0, reserve1, self.total_supply(), want_is_token0)
    }

    /// `(want_mint, other_mint)` for an agent
    pub fn mints_for(
        &self,
        want_is_token0: bool,
    ) -> (&InterfaceAccount<'info, Mint>, &InterfaceAccount<'info, Mint>) {
        if want_is_token0 {
            (&*self.token0_mint, &*self.token1_mint)
        } else {
            (&*self.token1_mint, &*self.token0_mint)
        }
    }

    /// Offer `amount0`/`amount1`; only the amounts the curve consumes leave
    /// the provider. Mints LP to `provider.lp`.
    pub fn deposit(
        &mut self,
        provider: &Provider<'_, 'info>,
        amount0: u64,
        amount1: u64,
    ) -> Result<Deposit> {
        let (reserve0, reserve1) = self.reserves();
        let terms = liquidity_for_deposit(amount0, amount1, reserve0, reserve1, self.total_supply())?;

        transfer_tokens(
            &self.token_program,
            provider.token0,
            &self.vault0,
            &self.token0_mint,
            provider.authority.clone(),
            provider.signer_seeds,
            terms.used0,
        )?;
        transfer_tokens(
            &self.token_program,
            provider.token1,
            &self.vault1,
            &self.token1_mint,
            provider.authority.clone(),
            provider.signer_seeds,
            terms.used1,
        )?;

        let pool_signer = self.state.signer();
        let pool_seeds = pool_signer.seeds();

        mint_to(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                MintTo {
                    mint: self.lp_mint.to_account_info(),
                    to: provider.lp.to_account_info(),
                    authority: self.state.to_account_info(),
                },
                &[&pool_seeds[..]],
            ),
            terms.liquidity,
        )?;

        self.state.reserve0 = reserve0.checked_add(terms.used0).ok_or(CurveError::Overflow)?;
        self.state.reserve1 = reserve1.checked_add(terms.used1).ok_or(CurveError::Overflow)?;
        self.lp_mint.reload()?;

        Ok(terms)
    }

    /// Burn `shares` of the provider's LP and release both reserves to it.
    /// Returns `(amount0, amount1)`.
    pub fn withdraw(&mut self, provider: &Provider<'_, 'info>, shares: u64) -> Result<(u64, u64)> {
        let (reserve0, reserve1) = self.reserves();
        let (out0, out1) = amounts_for_burn(shares, reserve0, reserve1, self.total_supply())?;

        burn(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                Burn {
                    mint: self.lp_mint.to_account_info(),
                    from: provider.lp.to_account_info(),
                    authority: provider.authority.clone(),
                },
                provider.signer_seeds,
            ),
            shares,
        )?;

        let pool_signer = self.state.signer();
        let pool_seeds = pool_signer.seeds();
        let pool_signer_seeds = [&pool_seeds[..]];

        transfer_tokens(
            &self.token_program,
            &self.vault0,
            provider.token0,
            &self.token0_mint,
            self.state.to_account_info(),
            &pool_signer_seeds,
            out0,
        )?;
        transfer_tokens(
            &self.token_program,
            &self.vault1,
            provider.token1,
            &self.token1_mint,
            self.state.to_account_info(),
            &pool_signer_seeds,
            out1,
        )?;

        self.state.reserve0 = reserve0.checked_sub(out0).ok_or(CurveError::InsufficientLiquidity)?;
        self.state.reserve1 = reserve1.checked_sub(out1).ok_or(CurveError::InsufficientLiquidity)?;
        self.lp_mint.reload()?;

        Ok((out0, out1))
    }

    /// Sell `amount_in` from `source` and pay the output into `destination`.
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        &mut self,
        source: &InterfaceAccount<'info, TokenAccount>,
        destination: &InterfaceAccount<'info, TokenAccount>,
        authority: AccountInfo<'info>,
        signer_seeds: &[&[&[u8]]],
        amount_in: u64,
        min_amount_out: u64,
        zero_for_one: bool,
    ) -> Result<u64> {
        let (reserve0, reserve1) = self.reserves();
        let (reserve_in, reserve_out) = if zero_for_one {
            (reserve0, reserve1)
        } else {
            (reserve1, reserve0)
        };

        let amount_out = swap_output(amount_in, reserve_in, reserve_out, self.state.fee_bps)?;
        require!(amount_out >= min_amount_out, PoolError::SlippageExceeded);

        let (vault_in, vault_out, mint_in, mint_out) = if zero_for_one {
            (&self.vault0, &self.vault1, &self.token0_mint, &self.token1_mint)
        } else {
            (&self.vault1, &self.vault0, &self.token1_mint, &self.token0_mint)
        };

        transfer_tokens(
            &self.token_program,
            source,
            vault_in,
            mint_in,
            authority,
            signer_seeds,
            amount_in,
        )?;

        let pool_signer = self.state.signer();
        let pool_seeds = pool_signer.seeds();

        transfer_tokens(
            &self.token_program,
            vault_out,
            destination,
            mint_out,
            self.state.to_account_info(),
            &[&pool_seeds[..]],
            amount_out,
        )?;

        let new_in = reserve_in.checked_add(amount_in).ok_or(CurveError::Overflow)?;
        let new_out = reserve_out - amount_out;
        if zero_for_one {
            self.state.reserve0 = new_in;
            self.state.reserve1 = new_out;
        } else {
            self.state.reserve1 = new_in;
            self.state.reserve0 = new_out;
        }

        Ok(amount_out)
    }
}

/// `transfer_checked` that skips zero amounts. Pass empty `signer_seeds`
/// when `authority` signed the transaction itself.
pub fn transfer_tokens<'info>(
    token_program: &Interface<'info, TokenInterface>,
    from: &InterfaceAccount<'info, TokenAccount>,
    to: &InterfaceAccount<'info, TokenAccount>,
    mint: &InterfaceAccount<'info, Mint>,
    authority: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    transfer_checked(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            TransferChecked {
                from: from.to_account_info(),
                mint: mint.to_account_info(),
                to: to.to_account_info(),
                authority,
            },
            signer_seeds,
        ),
        amount,
        mint.decimals,
    )
}

#[error_code]
pub enum PoolError {
    #[msg("Account does not belong to this pool")]
    AccountMismatch,
    #[msg("Pool assets must be two different mints")]
    IdenticalMints,
    #[msg("Pool fee cannot exceed 10%")]
    FeeTooHigh,
    #[msg("Slippage tolerance exceeded")]
    SlippageExceeded,
    #[msg("Token account holds the wrong mint")]
    WrongMint,
}
