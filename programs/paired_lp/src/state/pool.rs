//! Constant-Product Pool State
//!
//! The pool both agents provide liquidity to. Reserves are tracked on the
//! account rather than read from the token accounts, so tokens sent straight
//! to a reserve account never move the price.

use anchor_lang::prelude::*;

/// Two-asset constant-product pool
///
/// Seeds: ["pool", token0_mint, token1_mint]
#[account]
#[derive(InitSpace)]
pub struct Pool {
    /// First asset of the pair
    pub token0_mint: Pubkey,

    /// Second asset of the pair
    pub token1_mint: Pubkey,

    /// LP (pool-share) mint, authority = this pool
    pub lp_mint: Pubkey,

    /// Reserve account for token0 (ATA of the pool)
    pub vault0: Pubkey,

    /// Reserve account for token1 (ATA of the pool)
    pub vault1: Pubkey,

    /// Tracked token0 reserve
    pub reserve0: u64,

    /// Tracked token1 reserve
    pub reserve1: u64,

    /// Swap fee in basis points, charged on input
    pub fee_bps: u16,

    /// PDA bump seed
    pub bump: u8,
}

impl Pool {
    pub const SEED: &'static [u8] = b"pool";
    pub const LP_MINT_SEED: &'static [u8] = b"lp_mint";
    pub const LP_DECIMALS: u8 = 9;
    /// Upper bound on the swap fee (10%)
    pub const MAX_FEE_BPS: u16 = 1_000;

    pub fn holds(&self, mint: &Pubkey) -> bool {
        self.token0_mint == *mint || self.token1_mint == *mint
    }

    pub fn signer(&self) -> PoolSigner {
        PoolSigner {
            token0_mint: self.token0_mint,
            token1_mint: self.token1_mint,
            bump: [self.bump],
        }
    }
}

/// Owned copy of the pool's PDA seeds, so CPIs can sign while the pool
/// account itself is borrowed mutably
#[derive(Clone, Copy)]
pub struct PoolSigner {
    token0_mint: Pubkey,
    token1_mint: Pubkey,
    bump: [u8; 1],
}

impl PoolSigner {
    pub fn seeds(&self) -> [&[u8]; 4] {
        [
            Pool::SEED,
            self.token0_mint.as_ref(),
            self.token1_mint.as_ref(),
            &self.bump,
        ]
    }
}
