//! Agent State
//!
//! One agent per side of the pair. An agent manages its `want` asset, holds
//! half of the joint LP position, and trusts exactly one other agent: the
//! one stored in `partner`.

use anchor_lang::prelude::*;

use crate::math::ReserveView;

/// A liquidity-providing agent
///
/// Seeds: ["agent", pool, want_mint, id.to_le_bytes()]
#[account]
#[derive(InitSpace)]
pub struct Agent {
    /// Administrative authority (partner override, emergency exit)
    pub owner: Pubkey,

    /// Fund manager that drives report / enter / exit / migrate
    pub vault: Pubkey,

    /// Shared constant-product pool
    pub pool: Pubkey,

    /// Asset this agent manages
    pub want_mint: Pubkey,

    /// Asset the partner manages
    pub other_mint: Pubkey,

    /// Idle want, owned by this PDA
    pub want_account: Pubkey,

    /// Transient other balance, owned by this PDA
    pub other_account: Pubkey,

    /// LP holdings, owned by this PDA
    pub lp_account: Pubkey,

    /// The only agent allowed to make partner calls on this one
    pub partner: Pubkey,

    /// Whether want is the pool's token0
    pub want_is_token0: bool,

    /// Once set, the position only shrinks
    pub emergency_exit: bool,

    /// Want value of the LP position at the last settlement
    pub settled_value: u64,

    /// Distinguishes successive agents on the same pool and asset
    pub id: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl Agent {
    pub const SEED: &'static [u8] = b"agent";

    pub fn signer(&self) -> AgentSigner {
        AgentSigner {
            pool: self.pool,
            want_mint: self.want_mint,
            id: self.id.to_le_bytes(),
            bump: [self.bump],
        }
    }

    /// Read the agent stored at `info`, or `None` when nothing this program
    /// owns lives there yet. Any other account this program owns is rejected.
    pub fn load_if_initialized(info: &AccountInfo) -> Result<Option<Agent>> {
        if info.owner != &crate::ID || info.data_is_empty() {
            return Ok(None);
        }

        let data = info.try_borrow_data()?;
        Agent::try_deserialize(&mut &data[..]).map(Some)
    }

    /// Orient pool reserves to this agent's want
    pub fn view(&self, reserve0: u64, reserve1: u64, total_supply: u64) -> ReserveView {
        ReserveView::oriented(reserve0, reserve1, total_supply, self.want_is_token0)
    }

    /// Whether `key` may act for this agent (its vault or its owner)
    pub fn is_authority(&self, key: &Pubkey) -> bool {
        self.vault == *key || self.owner == *key
    }

    /// Reject any caller other than the currently registered partner
    pub fn authorize_partner(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(self.partner, *caller, AgentError::NotPartner);
        Ok(())
    }

    /// Partner-privileged re-point, used when the partner itself is being
    /// replaced by a successor. Moves no assets.
    pub fn migrate_partner(&mut self, caller: &Pubkey, new_partner: Pubkey) -> Result<()> {
        self.authorize_partner(caller)?;
        require_keys_neq!(new_partner, Pubkey::default(), AgentError::InvalidPartner);
        self.partner = new_partner;
        Ok(())
    }

    /// Two agents that can pair: same pool, mirrored assets
    pub fn complements(&self, other: &Agent) -> bool {
        self.pool == other.pool
            && self.want_mint == other.other_mint
            && self.other_mint == other.want_mint
    }
}

/// Check both ends of a partner edge before any cross-agent flow.
///
/// The callee must name the caller as its partner (the privilege check) and
/// the caller must name the callee back, so an edge left half-updated by a
/// unilateral `set_partner` cannot move funds.
pub fn check_pairing(
    caller_key: &Pubkey,
    caller: &Agent,
    callee_key: &Pubkey,
    callee: &Agent,
) -> Result<()> {
    require_keys_neq!(*caller_key, *callee_key, AgentError::SelfPartner);
    callee.authorize_partner(caller_key)?;
    require_keys_eq!(caller.partner, *callee_key, AgentError::AsymmetricPair);
    require!(caller.complements(callee), AgentError::AssetMismatch);
    Ok(())
}

/// Owned copy of an agent's PDA seeds
#[derive(Clone, Copy)]
pub struct AgentSigner {
    pool: Pubkey,
    want_mint: Pubkey,
    id: [u8; 8],
    bump: [u8; 1],
}

impl AgentSigner {
    pub fn seeds(&self) -> [&[u8]; 5] {
        [
            Agent::SEED,
            self.pool.as_ref(),
            self.want_mint.as_ref(),
            &self.id,
            &self.bump,
        ]
    }
}

#[error_code]
pub enum AgentError {
    #[msg("Caller is not the registered partner")]
    NotPartner,
    #[msg("Partner does not point back at the caller")]
    AsymmetricPair,
    #[msg("Agents do not manage mirrored assets of the same pool")]
    AssetMismatch,
    #[msg("An agent cannot partner with itself")]
    SelfPartner,
    #[msg("Partner address is invalid")]
    InvalidPartner,
    #[msg("Signer is not an authority of the calling agent")]
    NotAuthority,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(pool: Pubkey, want: Pubkey, other: Pubkey, partner: Pubkey) -> Agent {
        Agent {
            owner: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            pool,
            want_mint: want,
            other_mint: other,
            want_account: Pubkey::new_unique(),
            other_account: Pubkey::new_unique(),
            lp_account: Pubkey::new_unique(),
            partner,
            want_is_token0: true,
            emergency_exit: false,
            settled_value: 0,
            id: 0,
            bump: 255,
        }
    }

    struct Pair {
        a_key: Pubkey,
        a: Agent,
        b_key: Pubkey,
        b: Agent,
    }

    fn pair() -> Pair {
        let pool = Pubkey::new_unique();
        let x = Pubkey::new_unique();
        let y = Pubkey::new_unique();
        let a_key = Pubkey::new_unique();
        let b_key = Pubkey::new_unique();
        let mut b = agent(pool, y, x, a_key);
        b.want_is_token0 = false;

        Pair {
            a_key,
            a: agent(pool, x, y, b_key),
            b_key,
            b,
        }
    }

    #[test]
    fn test_symmetric_pair_is_accepted() {
        let p = pair();
        assert!(check_pairing(&p.a_key, &p.a, &p.b_key, &p.b).is_ok());
        assert!(check_pairing(&p.b_key, &p.b, &p.a_key, &p.a).is_ok());
    }

    #[test]
    fn test_stranger_is_rejected() {
        let p = pair();
        let stranger_key = Pubkey::new_unique();
        let mut stranger = p.a.clone();
        stranger.partner = p.b_key;

        assert!(p.b.authorize_partner(&stranger_key).is_err());
        assert!(check_pairing(&stranger_key, &stranger, &p.b_key, &p.b).is_err());
    }

    #[test]
    fn test_asymmetric_pair_is_inert() {
        let mut p = pair();
        // Owner of A points it elsewhere; B still trusts A
        p.a.partner = Pubkey::new_unique();

        assert!(p.b.authorize_partner(&p.a_key).is_ok());
        assert!(check_pairing(&p.a_key, &p.a, &p.b_key, &p.b).is_err());
        assert!(check_pairing(&p.b_key, &p.b, &p.a_key, &p.a).is_err());
    }

    #[test]
    fn test_same_asset_agents_do_not_pair() {
        let mut p = pair();
        p.b.want_mint = p.a.want_mint;
        assert!(check_pairing(&p.a_key, &p.a, &p.b_key, &p.b).is_err());
    }

    #[test]
    fn test_migrate_partner_requires_current_partner() {
        let mut p = pair();
        let successor = Pubkey::new_unique();
        let before = p.b.clone();

        assert!(p.b.migrate_partner(&Pubkey::new_unique(), successor).is_err());
        assert_eq!(p.b.partner, before.partner);

        p.b.migrate_partner(&p.a_key, successor).unwrap();
        assert_eq!(p.b.partner, successor);

        // The old partner lost its privilege the moment the edge moved
        assert!(p.b.migrate_partner(&p.a_key, p.a_key).is_err());
        assert!(p.b.authorize_partner(&p.a_key).is_err());
    }

    #[test]
    fn test_load_reads_deployed_agent() {
        let p = pair();
        let key = p.a_key;
        let mut data = Vec::new();
        p.a.try_serialize(&mut data).unwrap();
        let mut lamports = 1_000_000;
        let info = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &crate::ID, false, 0);

        let loaded = Agent::load_if_initialized(&info).unwrap().unwrap();
        assert_eq!(loaded.want_mint, p.a.want_mint);
        assert_eq!(loaded.partner, p.b_key);
    }

    #[test]
    fn test_load_skips_undeployed_address() {
        let key = Pubkey::new_unique();
        let system = Pubkey::default();
        let mut data = Vec::new();
        let mut lamports = 0;
        let info = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &system, false, 0);

        assert!(Agent::load_if_initialized(&info).unwrap().is_none());
    }

    #[test]
    fn test_load_rejects_non_agent_data() {
        let key = Pubkey::new_unique();
        let mut data = vec![7u8; 64];
        let mut lamports = 1_000_000;
        let info = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &crate::ID, false, 0);

        assert!(Agent::load_if_initialized(&info).is_err());
    }

    #[test]
    fn test_view_orients_to_want() {
        let p = pair();
        assert_eq!(p.a.view(10, 20, 5).reserve_want, 10);
        assert_eq!(p.b.view(10, 20, 5).reserve_want, 20);
    }

    #[test]
    fn test_signer_seeds_match_derivation() {
        let p = pair();
        let signer = p.a.signer();
        let seeds = signer.seeds();
        assert_eq!(seeds[0], Agent::SEED);
        assert_eq!(seeds[1], p.a.pool.as_ref());
        assert_eq!(seeds[2], p.a.want_mint.as_ref());
        assert_eq!(seeds[3], &0u64.to_le_bytes());
        assert_eq!(seeds[4], &[255u8]);
    }
}
