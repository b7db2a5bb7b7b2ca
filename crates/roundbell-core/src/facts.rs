//! Motivational facts shown during breaks.

use rand::seq::SliceRandom;
use rand::Rng;

/// Fixed, non-empty pool of break-time facts.
pub const FACTS: &[&str] = &[
    "Boxing burns up to 800 calories per hour!",
    "Muhammad Ali's famous shuffle wasn't just for show - it helped with footwork.",
    "A boxer's punch can generate up to 1,300 pounds of force!",
    "Shadow boxing improves coordination and muscle memory.",
    "Professional boxers train 4-6 hours daily on average.",
];

/// Pick a fact uniformly at random.
pub fn pick() -> &'static str {
    pick_with(&mut rand::thread_rng())
}

/// Pick a fact using the given RNG.
pub fn pick_with<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    FACTS.choose(rng).copied().unwrap_or(FACTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn pick_returns_a_known_fact() {
        for _ in 0..50 {
            assert!(FACTS.contains(&pick()));
        }
    }

    #[test]
    fn seeded_picks_cover_the_pool() {
        let mut rng = rand_pcg::Pcg64::seed_from_u64(7);
        let seen: HashSet<&str> = (0..500).map(|_| pick_with(&mut rng)).collect();
        assert_eq!(seen.len(), FACTS.len());
    }
}
