//! # Position Valuation
//!
//! Spot valuation of an LP balance in one agent's asset.
//!
//! Under `x · y = k` a pool share entitles its holder to an equal *value* of
//! each reserve at the current price, so the whole claim is worth twice the
//! claim on a single reserve:
//!
//! ```text
//! value_in_want = s · (2 · r_want) / T
//! ```
//!
//! This is a spot estimate. It ignores the slippage a holder would pay to
//! actually redeem and swap the position and is only suitable for approximate
//! reporting, never for pricing trades.

/// Pool reserves and supply seen from one agent's side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReserveView {
    pub reserve_want: u64,
    pub reserve_other: u64,
    pub total_supply: u64,
}

/// Rounding direction for share conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Never hand out more value than asked for
    Down,
    /// Always cover at least the requested value
    Up,
}

impl ReserveView {
    /// Orient pool reserves for an agent whose want is token0 or token1
    pub fn oriented(reserve0: u64, reserve1: u64, total_supply: u64, want_is_token0: bool) -> Self {
        let (reserve_want, reserve_other) = if want_is_token0 {
            (reserve0, reserve1)
        } else {
            (reserve1, reserve0)
        };

        Self {
            reserve_want,
            reserve_other,
            total_supply,
        }
    }

    /// The same pool seen from the partner's side
    pub fn flipped(&self) -> Self {
        Self {
            reserve_want: self.reserve_other,
            reserve_other: self.reserve_want,
            total_supply: self.total_supply,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_supply == 0 || self.reserve_want == 0 || self.reserve_other == 0
    }

    /// Value of `shares` LP tokens in want
    pub fn value_of(&self, shares: u64) -> u64 {
        position_value_in_want(shares, self.total_supply, self.reserve_want)
    }

    /// LP tokens needed to cover `value` in want.
    ///
    /// Returns 0 for an empty pool: there is nothing to redeem.
    pub fn shares_for_value(&self, value: u64, rounding: Rounding) -> u64 {
        if self.total_supply == 0 || self.reserve_want == 0 {
            return 0;
        }

        let numerator = value as u128 * self.total_supply as u128;
        let denominator = 2 * self.reserve_want as u128;
        let shares = match rounding {
            Rounding::Down => numerator / denominator,
            Rounding::Up => (numerator + denominator - 1) / denominator,
        };

        u64::try_from(shares).unwrap_or(u64::MAX)
    }
}

/// `s · 2 · r_want / T`, truncating. Zero supply values everything at 0.
pub fn position_value_in_want(shares: u64, total_supply: u64, reserve_want: u64) -> u64 {
    if total_supply == 0 {
        return 0;
    }

    // floor(2·s·r / T) split as 2·q + floor(2·rem / T) so the product never
    // needs more than 128 bits
    let t = total_supply as u128;
    let claim = shares as u128 * reserve_want as u128;
    let value = (claim / t)
        .saturating_mul(2)
        .saturating_add(2 * (claim % t) / t);
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_balanced_pool_value() {
        // 1000 X / 1000 Y, 200 LP outstanding, agent holds 50
        assert_eq!(position_value_in_want(50, 200, 1_000), 500);
    }

    #[test]
    fn test_empty_supply_is_worth_nothing() {
        assert_eq!(position_value_in_want(0, 0, 1_000), 0);
        assert_eq!(position_value_in_want(50, 0, 1_000), 0);
        assert_eq!(position_value_in_want(u64::MAX, 0, u64::MAX), 0);
    }

    #[test]
    fn test_orientation_selects_want_reserve() {
        let v0 = ReserveView::oriented(1_000, 4_000, 200, true);
        let v1 = ReserveView::oriented(1_000, 4_000, 200, false);

        assert_eq!(v0.value_of(50), 500);
        assert_eq!(v1.value_of(50), 2_000);
        assert_eq!(v0.flipped(), v1);
    }

    #[test]
    fn test_shares_for_value_rounding() {
        let view = ReserveView::oriented(1_000, 1_000, 200, true);
        // One share is worth 10 want
        assert_eq!(view.shares_for_value(25, Rounding::Down), 2);
        assert_eq!(view.shares_for_value(25, Rounding::Up), 3);
        assert_eq!(view.shares_for_value(30, Rounding::Up), 3);
        assert_eq!(ReserveView::default().shares_for_value(30, Rounding::Up), 0);
    }

    proptest! {
        #[test]
        fn value_is_monotonic_in_shares(
            t in 1u64..u64::MAX,
            r in 0u64..u64::MAX,
            a in 0u64..u64::MAX,
            b in 0u64..u64::MAX,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(position_value_in_want(lo, t, r) <= position_value_in_want(hi, t, r));
        }

        #[test]
        fn rounded_down_shares_never_exceed_value(
            t in 1u64..1_000_000_000,
            r in 1u64..1_000_000_000,
            value in 0u64..1_000_000_000,
        ) {
            let view = ReserveView { reserve_want: r, reserve_other: r, total_supply: t };
            let shares = view.shares_for_value(value, Rounding::Down);
            prop_assert!(view.value_of(shares) <= value);
        }

        #[test]
        fn rounded_up_shares_cover_value(
            t in 1u64..1_000_000_000,
            r in 1u64..1_000_000_000,
            value in 0u64..1_000_000_000,
        ) {
            let view = ReserveView { reserve_want: r, reserve_other: r, total_supply: t };
            let shares = view.shares_for_value(value, Rounding::Up);
            prop_assert!(view.value_of(shares) >= value);
        }
    }
}
