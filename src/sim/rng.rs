//! Seeded random stream
//!
//! A seed string hashes to a 32-bit state that seeds a PCG core, so two
//! generators built from the same non-empty string replay the same sequence.

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;

/// Order-sensitive 32-bit avalanche hash of a seed string
pub fn seed_hash(seed: &str) -> u32 {
    let len = seed.chars().count() as u32;
    seed.chars().fold(1_779_033_703 ^ len, |h, c| {
        (h ^ c as u32).wrapping_mul(3_432_918_353).rotate_left(13)
    })
}

/// Random source threaded through every call that needs randomness
#[derive(Debug, Clone)]
pub struct SimRng {
    inner: Pcg32,
    seed: Option<String>,
}

impl SimRng {
    /// Build from an optional seed string. Empty or missing seeds are
    /// non-deterministic.
    pub fn from_seed_str(seed: Option<&str>) -> Self {
        match seed.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => Self {
                inner: Pcg32::seed_from_u64(u64::from(seed_hash(s))),
                seed: Some(s.to_string()),
            },
            None => Self {
                inner: Pcg32::from_os_rng(),
                seed: None,
            },
        }
    }

    /// Deterministic generator from a seed string
    pub fn seeded(seed: &str) -> Self {
        Self::from_seed_str(Some(seed))
    }

    /// Non-deterministic generator
    pub fn entropy() -> Self {
        Self::from_seed_str(None)
    }

    /// The seed string this stream was built from, if any
    pub fn seed(&self) -> Option<&str> {
        self.seed.as_deref()
    }

    /// Next uniform value in [0, 1)
    #[inline]
    pub fn next_unit(&mut self) -> f32 {
        self.inner.random::<f32>()
    }
}

impl RngCore for SimRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.inner.fill_bytes(dst)
    }
}

/// Scale the unit stream linearly onto [min, max)
#[inline]
pub fn rand_range(rng: &mut SimRng, min: f32, max: f32) -> f32 {
    min + (max - min) * rng.next_unit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = SimRng::seeded("abc");
        let mut b = SimRng::seeded("abc");
        for _ in 0..1000 {
            assert_eq!(a.next_unit().to_bits(), b.next_unit().to_bits());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = SimRng::seeded("abc");
        let mut b = SimRng::seeded("abd");
        let sa: Vec<u32> = (0..16).map(|_| a.next_u32()).collect();
        let sb: Vec<u32> = (0..16).map(|_| b.next_u32()).collect();
        assert_ne!(sa, sb);
    }

    #[test]
    fn test_hash_is_order_sensitive() {
        assert_ne!(seed_hash("ab"), seed_hash("ba"));
        assert_eq!(seed_hash("fight"), seed_hash("fight"));
    }

    #[test]
    fn test_unit_range() {
        let mut rng = SimRng::seeded("range");
        for _ in 0..10_000 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
        let v = rand_range(&mut rng, 5.0, 7.0);
        assert!((5.0..7.0).contains(&v));
    }

    #[test]
    fn test_blank_seed_is_unseeded() {
        assert!(SimRng::from_seed_str(Some("   ")).seed().is_none());
        assert!(SimRng::from_seed_str(None).seed().is_none());
        assert_eq!(SimRng::seeded("abc").seed(), Some("abc"));
    }
}
