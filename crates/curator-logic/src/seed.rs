//! Seed derivation.
//!
//! One top-level seed reproduces an entire museum. Each stage draws from its
//! own `ChaCha8Rng` seeded from a value derived here, so floors differ from
//! one another and adding draws to one stage never shifts another.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Stride between consecutive floors' partition seeds.
pub const FLOOR_SEED_STRIDE: u64 = 7919;
const CONNECTION_SEED_SALT: u64 = 0x5eed_c0de_0000_0001;
const STAIR_SEED_SALT: u64 = 0x5eed_c0de_0000_0002;
const AGENT_SEED_SALT: u64 = 0x5eed_c0de_0000_0003;

/// Seed for partitioning floor `floor`.
pub fn floor_seed(seed: u64, floor: u32) -> u64 {
    seed.wrapping_add((floor as u64).wrapping_mul(FLOOR_SEED_STRIDE))
}

/// Seed for planning connections on floor `floor`.
pub fn connection_seed(seed: u64, floor: u32) -> u64 {
    floor_seed(seed, floor) ^ CONNECTION_SEED_SALT
}

/// Seed for the stair planner.
pub fn stair_seed(seed: u64) -> u64 {
    seed ^ STAIR_SEED_SALT
}

/// Seed for agent number `agent`.
pub fn agent_seed(seed: u64, agent: u32) -> u64 {
    (seed ^ AGENT_SEED_SALT).wrapping_add(agent as u64)
}

/// Deterministic stream for a derived seed.
pub fn rng_for(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_floor_seeds_differ() {
        assert_ne!(floor_seed(42, 0), floor_seed(42, 1));
        assert_eq!(floor_seed(42, 0), 42);
    }

    #[test]
    fn test_stage_seeds_independent() {
        assert_ne!(floor_seed(42, 0), connection_seed(42, 0));
        assert_ne!(stair_seed(42), agent_seed(42, 0));
    }

    #[test]
    fn test_wrapping_does_not_panic() {
        let _ = floor_seed(u64::MAX, u32::MAX);
        let _ = agent_seed(u64::MAX, u32::MAX);
    }

    #[test]
    fn test_rng_reproducible() {
        let mut a = rng_for(7);
        let mut b = rng_for(7);
        for _ in 0..8 {
            assert_eq!(a.gen::<u32>(), b.gen::<u32>());
        }
    }
}
