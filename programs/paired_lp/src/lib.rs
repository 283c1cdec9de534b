//! # Paired LP: Two Agents, One Pool Position
//!
//! Two liquidity-providing agents, each managing one asset of a
//! constant-product pool, jointly own a single LP position and settle with
//! each other as prices move.
//!
//! ## How it works
//! - Each agent is a PDA holding idle `want`, a transient `other` balance and
//!   half of the LP. Each names exactly one partner.
//! - Entering: the agent's idle want is pulled into its partner, paired with
//!   the partner's want, deposited, and the minted LP split in half.
//! - Rebalancing: whichever side's position gained value pays the gain to the
//!   other side in the other side's asset.
//! - A vault drives each agent through report / enter / exit / migrate.
//!
//! Valuation is spot and reserve-based. Use it for reporting, not pricing.

use anchor_lang::prelude::*;

pub mod instructions;
pub mod math;
pub mod state;

pub use instructions::*;
use math::{Liquidation, Report};

declare_id!("74mL8st37EcbQ3Um9ey5yrT1PfKK7SnodMmRxE82GV6d");

/// Paired liquidity program
#[program]
pub mod paired_lp {
    use super::*;

    /// Create the shared pool, its LP mint and reserve accounts
    pub fn initialize_pool(ctx: Context<InitializePool>, fee_bps: u16) -> Result<()> {
        ctx.accounts.initialize_pool(fee_bps, &ctx.bumps)
    }

    /// Public constant-product trade
    pub fn swap(
        ctx: Context<Swap>,
        amount_in: u64,
        min_amount_out: u64,
        zero_for_one: bool,
    ) -> Result<u64> {
        ctx.accounts.swap(amount_in, min_amount_out, zero_for_one)
    }

    /// Create an agent bound to a pool, a vault and a partner
    pub fn initialize_agent(
        ctx: Context<InitializeAgent>,
        id: u64,
        vault: Pubkey,
        partner: Pubkey,
    ) -> Result<()> {
        ctx.accounts.initialize_agent(id, vault, partner, &ctx.bumps)
    }

    /// Owner override of the partner reference (one end only)
    pub fn set_partner(ctx: Context<SetPartner>, new_partner: Pubkey) -> Result<()> {
        ctx.accounts.set_partner(new_partner)
    }

    /// Enter emergency exit (owner or vault, irreversible)
    pub fn set_emergency_exit(ctx: Context<SetEmergencyExit>) -> Result<()> {
        ctx.accounts.set_emergency_exit()
    }

    // ========== Partner Protocol ==========

    /// Callee pays its accrued benefit to the caller
    pub fn rebalance(ctx: Context<PartnerCall>) -> Result<u64> {
        ctx.accounts.rebalance()
    }

    /// Pair the caller's want with the callee's want and split the LP
    pub fn provide_and_split(ctx: Context<PartnerCall>, max_other: u64) -> Result<u64> {
        ctx.accounts.provide_and_split(max_other)
    }

    /// Re-point the callee at the caller's successor
    pub fn migrate_partner(ctx: Context<MigratePartner>, new_partner: Pubkey) -> Result<()> {
        ctx.accounts.migrate_partner(new_partner)
    }

    // ========== Lifecycle ==========

    /// Settle with the partner and report profit, loss and debt payment
    pub fn prepare_return(ctx: Context<Lifecycle>, debt_outstanding: u64) -> Result<Report> {
        ctx.accounts.prepare_return(debt_outstanding)
    }

    /// Invest idle want above the outstanding debt
    pub fn adjust_position(ctx: Context<Lifecycle>, debt_outstanding: u64) -> Result<()> {
        ctx.accounts.adjust_position(debt_outstanding)
    }

    /// Free up to `amount_needed` want
    pub fn liquidate_position(
        ctx: Context<Lifecycle>,
        amount_needed: u64,
    ) -> Result<Liquidation> {
        ctx.accounts.liquidate_position(amount_needed)
    }

    /// Free up to `amount_needed` want and send it to the vault
    pub fn withdraw(ctx: Context<Withdraw>, amount_needed: u64) -> Result<Liquidation> {
        ctx.accounts.withdraw(amount_needed)
    }

    /// Hand the position and the partner edge to a successor agent
    pub fn prepare_migration(ctx: Context<PrepareMigration>) -> Result<()> {
        ctx.accounts.prepare_migration()
    }

    // ========== Views ==========

    /// Idle want plus the LP position's value in want
    pub fn total_assets(ctx: Context<ViewAgent>) -> Result<u64> {
        ctx.accounts.total_assets()
    }

    /// Spot value of the agent's LP balance in want
    pub fn position_value_in_want(ctx: Context<ViewAgent>) -> Result<u64> {
        Ok(ctx.accounts.position_value_in_want())
    }
}
