//! # Vault Accounting
//!
//! Profit, loss and debt payment are derived from the agent's idle `want`
//! against what the vault says is outstanding. Nothing here is persisted;
//! the vault records whatever the instruction returns.
//!
//! ```text
//! idle ≥ debt  →  profit = idle - debt,  loss = 0
//! idle < debt  →  profit = 0,            loss = debt - idle
//! debt_payment = min(debt, idle - profit)
//! ```
//!
//! Exits size the LP burn against what a burn-then-sell actually returns,
//! fee and price impact included, so a shortfall only becomes `loss` once the
//! whole position is gone.

use anchor_lang::prelude::*;

use super::constant_product::{amounts_for_burn, swap_output};
use super::valuation::ReserveView;

/// Result of a report, returned to the vault
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Report {
    pub profit: u64,
    pub loss: u64,
    pub debt_payment: u64,
}

/// Result of freeing funds for the vault
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Liquidation {
    pub liquidated_amount: u64,
    pub loss: u64,
}

/// Settle a report from the idle balance and the outstanding debt
pub fn settle_report(idle: u64, debt_outstanding: u64) -> Report {
    let (profit, loss) = if idle >= debt_outstanding {
        (idle - debt_outstanding, 0)
    } else {
        (0, debt_outstanding - idle)
    };

    Report {
        profit,
        loss,
        debt_payment: debt_outstanding.min(idle - profit),
    }
}

/// Settle an exit once every recoverable unit has been made idle
pub fn settle_liquidation(idle: u64, amount_needed: u64) -> Liquidation {
    if idle >= amount_needed {
        Liquidation {
            liquidated_amount: amount_needed,
            loss: 0,
        }
    } else {
        Liquidation {
            liquidated_amount: idle,
            loss: amount_needed - idle,
        }
    }
}

/// Idle want the agent may put to work while keeping `debt_outstanding`
/// liquid. Nothing under emergency exit.
pub fn investable(idle: u64, debt_outstanding: u64, emergency_exit: bool) -> u64 {
    if emergency_exit {
        return 0;
    }

    idle.saturating_sub(debt_outstanding)
}

/// Want recovered by burning `shares` and selling everything held of the
/// other asset (`other_idle` plus the burn's other half) back into the pool.
pub fn unwind_proceeds(shares: u64, other_idle: u64, view: &ReserveView, fee_bps: u16) -> u64 {
    if shares == 0 {
        return 0;
    }

    let Ok((want_out, other_out)) =
        amounts_for_burn(shares, view.reserve_want, view.reserve_other, view.total_supply)
    else {
        return 0;
    };

    let reserve_want = view.reserve_want - want_out;
    let reserve_other = view.reserve_other - other_out;
    let sold = other_idle.saturating_add(other_out);

    let bought = if sold > 0 && reserve_want > 0 && reserve_other > 0 {
        swap_output(sold, reserve_other, reserve_want, fee_bps).unwrap_or(0)
    } else {
        0
    };

    want_out.saturating_add(bought)
}

/// Smallest LP burn whose unwind covers `shortfall`, or the whole `balance`
/// when even that falls short
pub fn shares_to_free(
    shortfall: u64,
    other_idle: u64,
    view: &ReserveView,
    fee_bps: u16,
    balance: u64,
) -> u64 {
    if shortfall == 0 || balance == 0 {
        return 0;
    }
    if unwind_proceeds(balance, other_idle, view, fee_bps) < shortfall {
        return balance;
    }

    // proceeds(hi) >= shortfall throughout
    let (mut lo, mut hi) = (0u64, balance);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if unwind_proceeds(mid, other_idle, view, fee_bps) >= shortfall {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    hi
}

/// Settled value a successor holds after taking over a position
pub fn carry_settled(successor_settled: u64, migrated_settled: u64) -> u64 {
    successor_settled.saturating_add(migrated_settled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_report_with_surplus() {
        let report = settle_report(150, 100);
        assert_eq!(
            report,
            Report {
                profit: 50,
                loss: 0,
                debt_payment: 100
            }
        );
    }

    #[test]
    fn test_report_with_shortfall() {
        let report = settle_report(150, 200);
        assert_eq!(report.profit, 0);
        assert_eq!(report.loss, 50);
        assert!(report.debt_payment <= 150);
    }

    #[test]
    fn test_report_when_even() {
        assert_eq!(
            settle_report(75, 75),
            Report {
                profit: 0,
                loss: 0,
                debt_payment: 75
            }
        );
        assert_eq!(settle_report(0, 0), Report::default());
    }

    #[test]
    fn test_liquidation() {
        assert_eq!(
            settle_liquidation(500, 300),
            Liquidation {
                liquidated_amount: 300,
                loss: 0
            }
        );
        assert_eq!(
            settle_liquidation(120, 300),
            Liquidation {
                liquidated_amount: 120,
                loss: 180
            }
        );
    }

    #[test]
    fn test_investable_keeps_debt_liquid() {
        assert_eq!(investable(150, 100, false), 50);
        assert_eq!(investable(100, 100, false), 0);
        assert_eq!(investable(80, 100, false), 0);
    }

    #[test]
    fn test_emergency_exit_invests_nothing() {
        assert_eq!(investable(150, 100, true), 0);
        assert_eq!(investable(u64::MAX, 0, true), 0);
    }

    fn pool(reserve_want: u64, reserve_other: u64, total_supply: u64) -> ReserveView {
        ReserveView {
            reserve_want,
            reserve_other,
            total_supply,
        }
    }

    /// Burn, sell the other half, settle: what `liquidate_position` does
    fn exit(idle: u64, needed: u64, balance: u64, view: &ReserveView, fee_bps: u16) -> (Liquidation, u64) {
        let shares = if idle < needed {
            shares_to_free(needed - idle, 0, view, fee_bps, balance)
        } else {
            0
        };
        let freed = idle + unwind_proceeds(shares, 0, view, fee_bps);
        (settle_liquidation(freed, needed), balance - shares)
    }

    #[test]
    fn test_exit_with_fee_covers_need_while_lp_remains() {
        // 1000/1000 pool, 200 LP, agent holds 100 LP, 30 bps fee
        let view = pool(1_000, 1_000, 200);
        let (result, lp_left) = exit(0, 100, 100, &view, 30);

        assert_eq!(
            result,
            Liquidation {
                liquidated_amount: 100,
                loss: 0
            }
        );
        assert!(lp_left > 0);
        assert!(lp_left < 90);
    }

    #[test]
    fn test_exit_burns_everything_before_reporting_loss() {
        let view = pool(1_000, 1_000, 200);
        let (result, lp_left) = exit(0, 5_000, 100, &view, 30);

        assert_eq!(lp_left, 0);
        assert!(result.loss > 0);
        assert_eq!(result.liquidated_amount + result.loss, 5_000);
    }

    #[test]
    fn test_unwind_sells_idle_other_too() {
        let view = pool(1_000, 1_000, 200);
        assert!(unwind_proceeds(10, 50, &view, 30) > unwind_proceeds(10, 0, &view, 30));
        assert_eq!(unwind_proceeds(0, 50, &view, 30), 0);
    }

    #[test]
    fn test_migration_carries_settled_value() {
        assert_eq!(carry_settled(0, 900), 900);
        assert_eq!(carry_settled(100, 900), 1_000);
        assert_eq!(carry_settled(u64::MAX, 1), u64::MAX);
    }

    proptest! {
        #[test]
        fn exit_has_no_loss_while_position_suffices(
            r_want in 1_000u64..1_000_000_000,
            r_other in 1_000u64..1_000_000_000,
            supply in 1_000u64..1_000_000_000,
            frac in 1u64..=500,
            idle in 0u64..1_000_000,
            needed in 0u64..1_000_000_000,
            fee in 0u16..=1_000,
        ) {
            let view = pool(r_want, r_other, supply);
            let balance = (supply as u128 * frac as u128 / 1_000) as u64;
            let (result, lp_left) = exit(idle, needed, balance, &view, fee);

            prop_assert_eq!(result.liquidated_amount as u128 + result.loss as u128, needed as u128);
            if result.loss > 0 {
                prop_assert_eq!(lp_left, 0);
            }
            if idle.saturating_add(unwind_proceeds(balance, 0, &view, fee)) >= needed {
                prop_assert_eq!(result.loss, 0);
            }
        }

        #[test]
        fn emergency_exit_never_invests(idle in any::<u64>(), debt in any::<u64>()) {
            prop_assert_eq!(investable(idle, debt, true), 0);
            prop_assert!(investable(idle, debt, false) <= idle);
        }

        #[test]
        fn report_has_one_sided_result(idle in any::<u64>(), debt in any::<u64>()) {
            let report = settle_report(idle, debt);
            prop_assert!(report.profit == 0 || report.loss == 0);
            if idle == debt {
                prop_assert_eq!(report.profit, 0);
                prop_assert_eq!(report.loss, 0);
            }
            prop_assert!(report.debt_payment <= debt.min(idle));
        }

        #[test]
        fn liquidation_accounts_for_every_unit(idle in any::<u64>(), needed in any::<u64>()) {
            let result = settle_liquidation(idle, needed);
            prop_assert!(result.liquidated_amount <= idle);
            prop_assert_eq!(result.liquidated_amount as u128 + result.loss as u128, needed as u128);
            if idle >= needed {
                prop_assert_eq!(result.loss, 0);
                prop_assert_eq!(result.liquidated_amount, needed);
            }
        }
    }
}
