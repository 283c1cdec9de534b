//! Arithmetic for the partner protocol: sizing a joint deposit, splitting the
//! minted LP, and measuring the benefit a rebalance may pay out.

use super::constant_product::Deposit;
use super::valuation::{ReserveView, Rounding};

/// How much of the caller's asset to pull and how much want to pair with it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProvidePlan {
    pub pull_other: u64,
    pub pair_want: u64,
}

impl ProvidePlan {
    pub fn is_empty(&self) -> bool {
        self.pull_other == 0 || self.pair_want == 0
    }

    /// Pulled other the deposit did not consume, owed back to the caller
    pub fn unconsumed_other(&self, deposit: &Deposit, want_is_token0: bool) -> u64 {
        let used_other = if want_is_token0 {
            deposit.used1
        } else {
            deposit.used0
        };
        self.pull_other.saturating_sub(used_other)
    }
}

/// Size a provide-and-split from the callee's point of view.
///
/// `view` is oriented to the callee, so `reserve_other` is the caller's
/// asset. The pull is capped by `max_other` and the caller's idle balance,
/// then shrunk until the callee's idle want can match it at the current
/// reserve ratio. An empty pool pairs the two assets one to one.
pub fn plan_provide(
    max_other: u64,
    caller_idle: u64,
    callee_idle_want: u64,
    view: &ReserveView,
) -> ProvidePlan {
    let offered = max_other.min(caller_idle);

    if view.is_empty() {
        let amount = offered.min(callee_idle_want);
        return ProvidePlan {
            pull_other: amount,
            pair_want: amount,
        };
    }

    let r_want = view.reserve_want as u128;
    let r_other = view.reserve_other as u128;

    let needed_want = offered as u128 * r_want / r_other;
    if needed_want <= callee_idle_want as u128 {
        return ProvidePlan {
            pull_other: offered,
            pair_want: needed_want as u64,
        };
    }

    let pull = callee_idle_want as u128 * r_other / r_want;
    ProvidePlan {
        pull_other: pull.min(offered as u128) as u64,
        pair_want: callee_idle_want,
    }
}

/// Split freshly minted LP: `(kept_by_callee, handed_to_caller)`
pub fn split_liquidity(minted: u64) -> (u64, u64) {
    let handed = minted / 2;
    (minted - handed, handed)
}

/// Value gained above the last settlement; never negative
pub fn accrued_benefit(current_value: u64, settled_value: u64) -> u64 {
    current_value.saturating_sub(settled_value)
}

/// LP the callee burns to realise `benefit`, rounded down so the payout
/// stays within what accrued, and never more than it holds
pub fn benefit_shares(benefit: u64, view: &ReserveView, balance: u64) -> u64 {
    view.shares_for_value(benefit, Rounding::Down).min(balance)
}

/// Settled value after `received` LP joins a position, valued from the
/// receiving agent's side of `view`
pub fn settled_after_provide(settled_value: u64, view: &ReserveView, received: u64) -> u64 {
    settled_value.saturating_add(view.value_of(received))
}

/// Settled value after a rebalance: the whole remaining position, so the
/// benefit just paid is not paid again
pub fn settled_after_rebalance(view_after: &ReserveView, remaining: u64) -> u64 {
    view_after.value_of(remaining)
}

/// Shrink the settled value in proportion to LP that left the position
pub fn scale_settled(settled_value: u64, remaining: u64, previous: u64) -> u64 {
    if previous == 0 {
        return 0;
    }

    (settled_value as u128 * remaining.min(previous) as u128 / previous as u128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constant_product::amounts_for_burn;
    use proptest::prelude::*;

    fn view(reserve_want: u64, reserve_other: u64, total_supply: u64) -> ReserveView {
        ReserveView {
            reserve_want,
            reserve_other,
            total_supply,
        }
    }

    #[test]
    fn test_plan_uses_full_offer_when_callee_can_match() {
        // 2 want per other
        let plan = plan_provide(100, 500, 1_000, &view(2_000, 1_000, 100));
        assert_eq!(
            plan,
            ProvidePlan {
                pull_other: 100,
                pair_want: 200
            }
        );
    }

    #[test]
    fn test_plan_bounded_by_caller_idle() {
        let plan = plan_provide(1_000, 40, 1_000, &view(1_000, 1_000, 100));
        assert_eq!(plan.pull_other, 40);
        assert_eq!(plan.pair_want, 40);
    }

    #[test]
    fn test_plan_shrinks_to_callee_want() {
        let plan = plan_provide(100, 500, 50, &view(2_000, 1_000, 100));
        assert_eq!(plan.pair_want, 50);
        assert_eq!(plan.pull_other, 25);
    }

    #[test]
    fn test_plan_on_empty_pool_pairs_one_to_one() {
        let plan = plan_provide(300, 500, 200, &ReserveView::default());
        assert_eq!(
            plan,
            ProvidePlan {
                pull_other: 200,
                pair_want: 200
            }
        );
    }

    #[test]
    fn test_plan_without_callee_want_is_empty() {
        assert!(plan_provide(100, 100, 0, &view(1_000, 1_000, 10)).is_empty());
        assert!(plan_provide(0, 100, 100, &view(1_000, 1_000, 10)).is_empty());
    }

    #[test]
    fn test_split_rounds_toward_callee() {
        assert_eq!(split_liquidity(10), (5, 5));
        assert_eq!(split_liquidity(11), (6, 5));
        assert_eq!(split_liquidity(1), (1, 0));
        assert_eq!(split_liquidity(0), (0, 0));
    }

    #[test]
    fn test_benefit_is_growth_over_settlement() {
        assert_eq!(accrued_benefit(1_100, 1_000), 100);
        assert_eq!(accrued_benefit(900, 1_000), 0);
        assert_eq!(accrued_benefit(1_000, 1_000), 0);
    }

    #[test]
    fn test_benefit_shares_capped_by_balance() {
        let v = view(1_000, 1_000, 200);
        assert_eq!(benefit_shares(100, &v, 50), 10);
        assert_eq!(benefit_shares(10_000, &v, 50), 50);
        assert_eq!(benefit_shares(9, &v, 50), 0);
    }

    #[test]
    fn test_scale_settled() {
        assert_eq!(scale_settled(1_000, 50, 100), 500);
        assert_eq!(scale_settled(1_000, 0, 100), 0);
        assert_eq!(scale_settled(1_000, 10, 0), 0);
    }

    #[test]
    fn test_unconsumed_other_goes_back() {
        let plan = ProvidePlan {
            pull_other: 100,
            pair_want: 200,
        };
        let deposit = Deposit {
            liquidity: 10,
            used0: 200,
            used1: 97,
        };
        // want is token0, so other is token1
        assert_eq!(plan.unconsumed_other(&deposit, true), 3);

        let deposit = Deposit {
            liquidity: 10,
            used0: 100,
            used1: 200,
        };
        assert_eq!(plan.unconsumed_other(&deposit, false), 0);
    }

    #[test]
    fn test_provide_raises_both_settlements() {
        // callee want 2000, caller want 1000, 100 LP
        let v = view(2_000, 1_000, 100);
        let (kept, handed) = split_liquidity(11);

        assert_eq!(settled_after_provide(500, &v, kept), 500 + 240);
        assert_eq!(settled_after_provide(0, &v.flipped(), handed), 100);
    }

    #[test]
    fn test_rebalance_resets_benefit() {
        // Position worth 1200 settled at 1000: 200 accrued
        let v = view(1_200, 1_000, 100);
        let balance = 50;
        let benefit = accrued_benefit(v.value_of(balance), 1_000);
        assert_eq!(benefit, 200);

        let shares = benefit_shares(benefit, &v, balance);
        let (want_out, other_out) =
            amounts_for_burn(shares, v.reserve_want, v.reserve_other, v.total_supply).unwrap();
        let after = view(
            v.reserve_want - want_out,
            v.reserve_other - other_out,
            v.total_supply - shares,
        );
        let settled = settled_after_rebalance(&after, balance - shares);

        assert!(v.value_of(shares) <= benefit);
        assert_eq!(accrued_benefit(after.value_of(balance - shares), settled), 0);
        // The rounded-down burn leaves 8 of the benefit in the position
        assert_eq!(settled, 1_008);
    }

    proptest! {
        #[test]
        fn unconsumed_never_exceeds_pull(
            pull in any::<u64>(),
            used0 in any::<u64>(),
            used1 in any::<u64>(),
            want_is_token0 in any::<bool>(),
        ) {
            let plan = ProvidePlan { pull_other: pull, pair_want: 1 };
            let deposit = Deposit { liquidity: 1, used0, used1 };
            prop_assert!(plan.unconsumed_other(&deposit, want_is_token0) <= pull);
        }

        #[test]
        fn split_conserves_minted(minted in any::<u64>()) {
            let (kept, handed) = split_liquidity(minted);
            prop_assert_eq!(kept as u128 + handed as u128, minted as u128);
            prop_assert!(kept >= handed);
            prop_assert!(kept - handed <= 1);
        }

        #[test]
        fn plan_respects_every_bound(
            max_other in any::<u64>(),
            caller_idle in any::<u64>(),
            callee_want in any::<u64>(),
            r_want in 1u64..u64::MAX,
            r_other in 1u64..u64::MAX,
            supply in 1u64..u64::MAX,
        ) {
            let plan = plan_provide(max_other, caller_idle, callee_want, &view(r_want, r_other, supply));
            prop_assert!(plan.pull_other <= max_other);
            prop_assert!(plan.pull_other <= caller_idle);
            prop_assert!(plan.pair_want <= callee_want);
        }

        #[test]
        fn rebalance_never_pays_more_than_accrued(
            current in 0u64..1_000_000_000,
            settled in 0u64..1_000_000_000,
            r_want in 1u64..1_000_000_000,
            supply in 1u64..1_000_000_000,
            balance in 0u64..1_000_000_000,
        ) {
            let v = view(r_want, r_want, supply);
            let benefit = accrued_benefit(current, settled);
            let shares = benefit_shares(benefit, &v, balance);
            prop_assert!(v.value_of(shares) <= benefit);
        }
    }
}
