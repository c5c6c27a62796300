//! Winner selection by uniform sampling without replacement.

use rand::Rng;

/// Draws up to `count` winners from `pool` without replacement.
///
/// Each step picks a uniformly random index and removes the picked entrant
/// from further consideration - a partial Fisher-Yates shuffle, so every
/// remaining entrant has equal probability at each step. Stops early when the
/// pool is exhausted. The caller's entrant list is unaffected; the pool is
/// consumed by value.
///
/// # Arguments
/// - `rng` - Random source; tests pass a seeded generator
/// - `pool` - Eligible entrants to draw from
/// - `count` - How many winners to draw
///
/// # Returns
/// - `Vec<String>` - Winners in draw order, at most `count` of them
pub fn draw_winners<R: Rng + ?Sized>(rng: &mut R, mut pool: Vec<String>, count: usize) -> Vec<String> {
    let mut winners = Vec::with_capacity(count.min(pool.len()));

    for _ in 0..count {
        if pool.is_empty() {
            break;
        }
        let index = rng.random_range(0..pool.len());
        winners.push(pool.swap_remove(index));
    }

    winners
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    /// Tests the basic draw shape.
    ///
    /// Expected: exactly `count` distinct winners, all from the pool
    #[test]
    fn draws_distinct_winners_from_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let entrants = pool(&["a", "b", "c", "d", "e"]);

        let winners = draw_winners(&mut rng, entrants.clone(), 2);

        assert_eq!(winners.len(), 2);
        assert_ne!(winners[0], winners[1]);
        for winner in &winners {
            assert!(entrants.contains(winner));
        }
    }

    /// Tests drawing more winners than entrants.
    ///
    /// Expected: the whole pool comes back, nothing repeats
    #[test]
    fn stops_when_pool_is_exhausted() {
        let mut rng = StdRng::seed_from_u64(7);

        let mut winners = draw_winners(&mut rng, pool(&["a", "b"]), 5);
        winners.sort();

        assert_eq!(winners, pool(&["a", "b"]));
    }

    /// Tests the empty cases.
    #[test]
    fn empty_pool_or_zero_count_draws_nothing() {
        let mut rng = StdRng::seed_from_u64(7);

        assert!(draw_winners(&mut rng, Vec::new(), 3).is_empty());
        assert!(draw_winners(&mut rng, pool(&["a"]), 0).is_empty());
    }

    /// Tests that every entrant is reachable.
    ///
    /// Across many seeded draws of one winner from three entrants, each
    /// entrant must win at least once.
    #[test]
    fn every_entrant_can_win() {
        let entrants = pool(&["a", "b", "c"]);
        let mut seen = std::collections::BTreeSet::new();

        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let winners = draw_winners(&mut rng, entrants.clone(), 1);
            seen.insert(winners[0].clone());
        }

        assert_eq!(seen.len(), 3);
    }
}
