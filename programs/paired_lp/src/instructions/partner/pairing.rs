//! The Partner Protocol
//!
//! Cross-agent operations run on a [`Pairing`]: the calling agent, the callee
//! (the caller's partner) and the shared pool.
//!
//! ## Trust model
//!
//! Both agents are PDAs of this program, so the program can sign for either
//! of them. That authority is the "pre-granted" transfer right between the two
//! sides, and it is only exercised after [`check_pairing`] has confirmed,
//! inside the same instruction, that the callee names the caller as its
//! partner and the caller names the callee back.
//!
//! ## Rebalance
//!
//! ```text
//! benefit = value_in_want(callee LP) - callee.settled_value     (≥ 0)
//! burn LP worth ≤ benefit  →  want half stays with the callee
//!                             other half is paid to the caller
//! callee.settled_value = value_in_want(remaining LP)
//! ```
//!
//! `settled_value` is a high-water mark, so the same price move is never paid
//! out twice and a rebalance with nothing accrued is a no-op.
//!
//! ## Provide and split
//!
//! ```text
//! pull ≤ min(max_other, caller idle)    caller want → callee other
//! pair with callee want at the reserve ratio, deposit both
//! minted LP: ⌈L/2⌉ stays, ⌊L/2⌋ goes to the caller
//! unconsumed other goes back to the caller
//! ```

use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use crate::instructions::pool::*;
use crate::math::{
    accrued_benefit, benefit_shares, plan_provide, scale_settled, settled_after_provide,
    settled_after_rebalance, shares_to_free, split_liquidity,
};
use crate::state::{check_pairing, Agent};

/// Event emitted when a callee settles accrued benefit with its partner
#[event]
pub struct Rebalanced {
    pub caller: Pubkey,
    pub callee: Pubkey,
    pub benefit: u64,
    pub shares_burned: u64,
    pub want_retained: u64,
    pub other_paid: u64,
    pub settled_value: u64,
}

/// Event emitted when new liquidity is provided and split
#[event]
pub struct LiquiditySplit {
    pub caller: Pubkey,
    pub callee: Pubkey,
    pub other_pulled: u64,
    pub want_paired: u64,
    pub other_returned: u64,
    pub minted: u64,
    pub kept: u64,
    pub handed: u64,
}

/// Caller, callee and pool accounts for a cross-agent operation
#[derive(Accounts)]
pub struct Pairing<'info> {
    pub pool: PoolAccounts<'info>,

    /// Agent making the call
    #[account(mut)]
    pub caller: Box<Account<'info, Agent>>,

    #[account(mut, address = caller.want_account @ PoolError::AccountMismatch)]
    pub caller_want: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = caller.other_account @ PoolError::AccountMismatch)]
    pub caller_other: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = caller.lp_account @ PoolError::AccountMismatch)]
    pub caller_lp: Box<InterfaceAccount<'info, TokenAccount>>,

    /// The caller's partner, on which the operation runs
    #[account(mut)]
    pub callee: Box<Account<'info, Agent>>,

    #[account(mut, address = callee.want_account @ PoolError::AccountMismatch)]
    pub callee_want: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = callee.other_account @ PoolError::AccountMismatch)]
    pub callee_other: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = callee.lp_account @ PoolError::AccountMismatch)]
    pub callee_lp: Box<InterfaceAccount<'info, TokenAccount>>,
}

impl<'info> Pairing<'info> {
    /// Re-read the partner edge and pool binding from the accounts
    pub fn validate(&self) -> Result<()> {
        let pool = self.pool.state.key();
        require_keys_eq!(self.caller.pool, pool, PoolError::AccountMismatch);
        require_keys_eq!(self.callee.pool, pool, PoolError::AccountMismatch);

        check_pairing(&self.caller.key(), &self.caller, &self.callee.key(), &self.callee)
    }

    pub fn is_paired(&self) -> bool {
        self.validate().is_ok()
    }

    /// Settle the callee's accrued benefit with the caller. Returns the
    /// benefit in the callee's want; 0 when nothing has accrued.
    pub fn rebalance(&mut self) -> Result<u64> {
        self.validate()?;

        let want_is_token0 = self.callee.want_is_token0;
        let view = self.pool.view(want_is_token0);
        let balance = self.callee_lp.amount;
        let benefit = accrued_benefit(view.value_of(balance), self.callee.settled_value);

        if benefit == 0 {
            msg!("Rebalance: nothing accrued");
            return Ok(0);
        }

        let shares = benefit_shares(benefit, &view, balance);
        if shares == 0 {
            msg!("Rebalance: benefit {} below one LP unit", benefit);
            return Ok(0);
        }

        let callee_signer = self.callee.signer();
        let callee_seeds = callee_signer.seeds();
        let signer_seeds = [&callee_seeds[..]];

        let provider = Provider::new(
            &self.callee_want,
            &self.callee_other,
            &self.callee_lp,
            self.callee.to_account_info(),
            want_is_token0,
            &signer_seeds,
        );
        let (out0, out1) = self.pool.withdraw(&provider, shares)?;
        let (want_retained, other_paid) = if want_is_token0 {
            (out0, out1)
        } else {
            (out1, out0)
        };

        // The other half of this burn goes to the caller
        let (_, other_mint) = self.pool.mints_for(want_is_token0);

        transfer_tokens(
            &self.pool.token_program,
            &self.callee_other,
            &self.caller_want,
            other_mint,
            self.callee.to_account_info(),
            &signer_seeds,
            other_paid,
        )?;

        self.callee_lp.reload()?;
        self.callee_want.reload()?;
        self.callee_other.reload()?;
        self.caller_want.reload()?;

        let settled_value =
            settled_after_rebalance(&self.pool.view(want_is_token0), self.callee_lp.amount);
        self.callee.settled_value = settled_value;

        emit!(Rebalanced {
            caller: self.caller.key(),
            callee: self.callee.key(),
            benefit,
            shares_burned: shares,
            want_retained,
            other_paid,
            settled_value,
        });

        msg!("Rebalance: benefit {}, paid {} to partner", benefit, other_paid);

        Ok(benefit)
    }

    /// Add liquidity with the caller's want and the callee's want, then split
    /// the minted LP. Returns the LP handed to the caller.
    pub fn provide_and_split(&mut self, max_other: u64) -> Result<u64> {
        self.validate()?;

        let want_is_token0 = self.callee.want_is_token0;
        let plan = plan_provide(
            max_other,
            self.caller_want.amount,
            self.callee_want.amount,
            &self.pool.view(want_is_token0),
        );

        if plan.is_empty() {
            msg!("Provide: nothing to pair");
            return Ok(0);
        }

        let caller_signer = self.caller.signer();
        let caller_seeds = caller_signer.seeds();
        let callee_signer = self.callee.signer();
        let callee_seeds = callee_signer.seeds();
        let callee_signer_seeds = [&callee_seeds[..]];

        // Pull the caller's want into the callee's other account
        let (_, other_mint) = self.pool.mints_for(want_is_token0);
        transfer_tokens(
            &self.pool.token_program,
            &self.caller_want,
            &self.callee_other,
            other_mint,
            self.caller.to_account_info(),
            &[&caller_seeds[..]],
            plan.pull_other,
        )?;

        let (amount0, amount1) = if want_is_token0 {
            (plan.pair_want, plan.pull_other)
        } else {
            (plan.pull_other, plan.pair_want)
        };

        let provider = Provider::new(
            &self.callee_want,
            &self.callee_other,
            &self.callee_lp,
            self.callee.to_account_info(),
            want_is_token0,
            &callee_signer_seeds,
        );
        let minted = self.pool.deposit(&provider, amount0, amount1)?;

        // Hand back whatever the deposit did not consume
        let other_returned = plan.unconsumed_other(&minted, want_is_token0);
        let (kept, handed) = split_liquidity(minted.liquidity);
        let (_, other_mint) = self.pool.mints_for(want_is_token0);

        transfer_tokens(
            &self.pool.token_program,
            &self.callee_other,
            &self.caller_want,
            other_mint,
            self.callee.to_account_info(),
            &callee_signer_seeds,
            other_returned,
        )?;
        transfer_tokens(
            &self.pool.token_program,
            &self.callee_lp,
            &self.caller_lp,
            &self.pool.lp_mint,
            self.callee.to_account_info(),
            &callee_signer_seeds,
            handed,
        )?;

        let view = self.pool.view(want_is_token0);
        self.callee.settled_value = settled_after_provide(self.callee.settled_value, &view, kept);
        self.caller.settled_value =
            settled_after_provide(self.caller.settled_value, &view.flipped(), handed);

        self.caller_want.reload()?;
        self.caller_lp.reload()?;
        self.callee_want.reload()?;
        self.callee_other.reload()?;
        self.callee_lp.reload()?;

        emit!(LiquiditySplit {
            caller: self.caller.key(),
            callee: self.callee.key(),
            other_pulled: plan.pull_other,
            want_paired: plan.pair_want,
            other_returned,
            minted: minted.liquidity,
            kept,
            handed,
        });

        msg!("Provide: minted {}, handed {} to partner", minted.liquidity, handed);

        Ok(handed)
    }

    /// Free at least `shortfall` want for the caller by burning its own LP
    /// and selling the other half back through the pool. The burn is sized
    /// on the post-swap proceeds; only a whole-position burn can come up
    /// short. Returns LP burned.
    pub fn free_want(&mut self, shortfall: u64) -> Result<u64> {
        let want_is_token0 = self.caller.want_is_token0;
        let balance = self.caller_lp.amount;
        let shares = shares_to_free(
            shortfall,
            self.caller_other.amount,
            &self.pool.view(want_is_token0),
            self.pool.state.fee_bps,
            balance,
        );

        if shares == 0 {
            return Ok(0);
        }

        let caller_signer = self.caller.signer();
        let caller_seeds = caller_signer.seeds();
        let signer_seeds = [&caller_seeds[..]];

        let provider = Provider::new(
            &self.caller_want,
            &self.caller_other,
            &self.caller_lp,
            self.caller.to_account_info(),
            want_is_token0,
            &signer_seeds,
        );
        self.pool.withdraw(&provider, shares)?;

        self.caller_other.reload()?;
        let other = self.caller_other.amount;
        let (reserve0, reserve1) = self.pool.reserves();

        if other > 0 && reserve0 > 0 && reserve1 > 0 {
            // Selling other: token0 -> token1 when want is token1
            self.pool.swap(
                &self.caller_other,
                &self.caller_want,
                self.caller.to_account_info(),
                &signer_seeds,
                other,
                0,
                !want_is_token0,
            )?;
        }

        self.caller_want.reload()?;
        self.caller_other.reload()?;
        self.caller_lp.reload()?;

        self.caller.settled_value =
            scale_settled(self.caller.settled_value, self.caller_lp.amount, balance);

        Ok(shares)
    }
}
