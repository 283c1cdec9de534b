//! Enter: put idle want beyond the outstanding debt to work with the partner.

use anchor_lang::prelude::*;

use super::*;
use crate::math::investable;

/// Event emitted when idle want is handed to the partner
#[event]
pub struct PositionAdjusted {
    pub agent: Pubkey,
    pub partner: Pubkey,
    pub offered: u64,
    pub lp_received: u64,
}

impl<'info> Lifecycle<'info> {
    pub fn adjust_position(&mut self, debt_outstanding: u64) -> Result<()> {
        self.authorize_vault()?;

        let emergency_exit = self.pair.caller.emergency_exit;
        let offered = investable(self.pair.caller_want.amount, debt_outstanding, emergency_exit);
        if offered == 0 {
            if emergency_exit {
                msg!("Adjust: emergency exit active, position unchanged");
            } else {
                msg!("Adjust: nothing above debt");
            }
            return Ok(());
        }

        let lp_received = self.pair.provide_and_split(offered)?;

        emit!(PositionAdjusted {
            agent: self.pair.caller.key(),
            partner: self.pair.callee.key(),
            offered,
            lp_received,
        });

        Ok(())
    }
}
