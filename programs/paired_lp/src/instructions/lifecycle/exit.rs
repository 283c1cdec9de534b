//! Exit: free want for the vault, unwinding LP only for the shortfall.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use super::*;
use crate::instructions::pool::transfer_tokens;
use crate::math::{settle_liquidation, Liquidation};

/// Event emitted when want is freed for the vault
#[event]
pub struct PositionLiquidated {
    pub agent: Pubkey,
    pub amount_needed: u64,
    pub lp_burned: u64,
    pub liquidated_amount: u64,
    pub loss: u64,
}

impl<'info> Lifecycle<'info> {
    pub fn liquidate_position(&mut self, amount_needed: u64) -> Result<Liquidation> {
        self.authorize_vault()?;
        self.liquidate(amount_needed)
    }

    fn liquidate(&mut self, amount_needed: u64) -> Result<Liquidation> {
        self.settle_with_partner()?;

        let idle = self.pair.caller_want.amount;
        let lp_burned = if idle < amount_needed {
            self.pair.free_want(amount_needed - idle)?
        } else {
            0
        };

        let liquidation = settle_liquidation(self.pair.caller_want.amount, amount_needed);

        emit!(PositionLiquidated {
            agent: self.pair.caller.key(),
            amount_needed,
            lp_burned,
            liquidated_amount: liquidation.liquidated_amount,
            loss: liquidation.loss,
        });

        msg!(
            "Liquidate: freed {}, loss {}",
            liquidation.liquidated_amount,
            liquidation.loss
        );

        Ok(liquidation)
    }
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    pub lifecycle: Lifecycle<'info>,

    /// Vault-owned want account receiving the freed funds
    #[account(mut)]
    pub destination: Box<InterfaceAccount<'info, TokenAccount>>,
}

impl<'info> Withdraw<'info> {
    /// Exit, then pay `liquidated_amount` out to the vault
    pub fn withdraw(&mut self, amount_needed: u64) -> Result<Liquidation> {
        self.lifecycle.authorize_vault()?;

        let agent = &self.lifecycle.pair.caller;
        require_keys_eq!(
            self.destination.mint,
            agent.want_mint,
            LifecycleError::WrongDestination
        );
        require_keys_eq!(
            self.destination.owner,
            agent.vault,
            LifecycleError::WrongDestination
        );

        let liquidation = self.lifecycle.liquidate(amount_needed)?;

        let pair = &self.lifecycle.pair;
        let agent_signer = pair.caller.signer();
        let agent_seeds = agent_signer.seeds();
        let (want_mint, _) = pair.pool.mints_for(pair.caller.want_is_token0);

        transfer_tokens(
            &pair.pool.token_program,
            &pair.caller_want,
            &self.destination,
            want_mint,
            pair.caller.to_account_info(),
            &[&agent_seeds[..]],
            liquidation.liquidated_amount,
        )?;

        msg!("Withdraw: {} sent to vault", liquidation.liquidated_amount);

        Ok(liquidation)
    }
}
