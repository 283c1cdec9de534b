//! Report: settle with the partner, then measure idle want against the
//! vault's outstanding debt.

use anchor_lang::prelude::*;

use super::*;
use crate::math::{settle_report, Report};

/// Event emitted on every report
#[event]
pub struct Reported {
    pub agent: Pubkey,
    pub debt_outstanding: u64,
    pub idle: u64,
    pub benefit: u64,
    pub profit: u64,
    pub loss: u64,
    pub debt_payment: u64,
}

impl<'info> Lifecycle<'info> {
    /// Funds stay in the agent; the vault pulls `debt_payment + profit`
    /// separately through `withdraw`.
    pub fn prepare_return(&mut self, debt_outstanding: u64) -> Result<Report> {
        self.authorize_vault()?;

        let benefit = self.settle_with_partner()?;
        let idle = self.pair.caller_want.amount;
        let report = settle_report(idle, debt_outstanding);

        emit!(Reported {
            agent: self.pair.caller.key(),
            debt_outstanding,
            idle,
            benefit,
            profit: report.profit,
            loss: report.loss,
            debt_payment: report.debt_payment,
        });

        msg!(
            "Report: profit {}, loss {}, debt payment {}",
            report.profit,
            report.loss,
            report.debt_payment
        );

        Ok(report)
    }
}
