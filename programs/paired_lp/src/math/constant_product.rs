//! # Constant-Product Curve
//!
//! Arithmetic behind the shared pool. Reserves follow the classic invariant:
//!
//! ```text
//!            reserve0 · reserve1 = k
//! ```
//!
//! ## Deposits
//!
//! The first deposit into an empty pool mints `√(a0 · a1)` LP tokens. Every
//! later deposit mints the smaller of the two proportional claims:
//!
//! ```text
//! L = min(a0 · T / r0, a1 · T / r1)
//! ```
//!
//! and consumes only `⌈L · r_i / T⌉` of each side. Because `L · r_i ≤ a_i · T`
//! the rounded-up amount never exceeds what was offered; the remainder stays
//! with the depositor.
//!
//! ## Burns
//!
//! Burning `s` LP tokens releases `⌊s · r_i / T⌋` of each reserve.
//!
//! ## Swaps
//!
//! The fee is taken on input:
//!
//! ```text
//! in'  = in · (10000 - fee_bps)
//! out  = in' · r_out / (r_in · 10000 + in')
//! ```

use anchor_lang::prelude::*;

/// Basis-point denominator for pool fees
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Errors raised by the curve arithmetic
#[error_code]
pub enum CurveError {
    #[msg("Invalid reserves: pool has supply but an empty side")]
    InvalidReserves,
    #[msg("Deposit would mint zero liquidity")]
    ZeroLiquidity,
    #[msg("Amount must be greater than zero")]
    ZeroAmount,
    #[msg("Cannot burn more than the total supply")]
    InsufficientLiquidity,
    #[msg("Arithmetic overflow")]
    Overflow,
}

/// Outcome of a deposit: LP minted and the amounts actually taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deposit {
    pub liquidity: u64,
    pub used0: u64,
    pub used1: u64,
}

/// Compute LP minted for offering `amount0`/`amount1` to a pool with the given
/// reserves and `supply` LP tokens outstanding.
pub fn liquidity_for_deposit(
    amount0: u64,
    amount1: u64,
    reserve0: u64,
    reserve1: u64,
    supply: u64,
) -> Result<Deposit> {
    require!(amount0 > 0 && amount1 > 0, CurveError::ZeroAmount);

    if supply == 0 {
        let product = (amount0 as u128)
            .checked_mul(amount1 as u128)
            .ok_or(CurveError::Overflow)?;
        let liquidity = to_u64(isqrt(product))?;
        require!(liquidity > 0, CurveError::ZeroLiquidity);

        return Ok(Deposit {
            liquidity,
            used0: amount0,
            used1: amount1,
        });
    }

    require!(reserve0 > 0 && reserve1 > 0, CurveError::InvalidReserves);

    let t = supply as u128;
    let claim0 = (amount0 as u128) * t / reserve0 as u128;
    let claim1 = (amount1 as u128) * t / reserve1 as u128;
    let liquidity = claim0.min(claim1);
    require!(liquidity > 0, CurveError::ZeroLiquidity);

    let used0 = div_ceil(liquidity * reserve0 as u128, t);
    let used1 = div_ceil(liquidity * reserve1 as u128, t);

    Ok(Deposit {
        liquidity: to_u64(liquidity)?,
        used0: to_u64(used0)?.min(amount0),
        used1: to_u64(used1)?.min(amount1),
    })
}

/// Reserve amounts released by burning `shares` LP tokens.
pub fn amounts_for_burn(shares: u64, reserve0: u64, reserve1: u64, supply: u64) -> Result<(u64, u64)> {
    require!(shares > 0, CurveError::ZeroAmount);
    require!(shares <= supply, CurveError::InsufficientLiquidity);

    let s = shares as u128;
    let t = supply as u128;
    let out0 = s * reserve0 as u128 / t;
    let out1 = s * reserve1 as u128 / t;

    Ok((to_u64(out0)?, to_u64(out1)?))
}

/// Output of selling `amount_in` into `reserve_in` with a fee on input.
pub fn swap_output(amount_in: u64, reserve_in: u64, reserve_out: u64, fee_bps: u16) -> Result<u64> {
    require!(amount_in > 0, CurveError::ZeroAmount);
    require!(reserve_in > 0 && reserve_out > 0, CurveError::InvalidReserves);

    let in_after_fee = (amount_in as u128)
        .checked_mul(BPS_DENOMINATOR - fee_bps as u128)
        .ok_or(CurveError::Overflow)?;
    let numerator = in_after_fee
        .checked_mul(reserve_out as u128)
        .ok_or(CurveError::Overflow)?;
    let denominator = (reserve_in as u128)
        .checked_mul(BPS_DENOMINATOR)
        .and_then(|v| v.checked_add(in_after_fee))
        .ok_or(CurveError::Overflow)?;

    to_u64(numerator / denominator)
}

/// Integer square root using Newton's method, floor(√x)
pub fn isqrt(x: u128) -> u128 {
    if x == 0 {
        return 0;
    }

    let mut z = x / 2 + 1;
    let mut y = x;

    while z < y {
        y = z;
        z = (x / z + z) / 2;
    }

    y
}

fn div_ceil(numerator: u128, denominator: u128) -> u128 {
    (numerator + denominator - 1) / denominator
}

fn to_u64(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| error!(CurveError::Overflow))
}
