//! Without-replacement draw order per category.
use super::AllocError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct CategoryPool {
    /// Shuffled permutation, popped from the end.
    remaining: Vec<usize>,
    size: usize,
}

/// Every index of a category is drawn exactly once per cycle; an exhausted
/// cycle is refilled with a fresh random permutation.
#[derive(Debug, Default)]
pub struct PoolSampler {
    pools: HashMap<String, CategoryPool>,
}

impl PoolSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw<R: Rng + ?Sized>(
        &mut self,
        category: &str,
        size: usize,
        rng: &mut R,
    ) -> Result<usize, AllocError> {
        if size == 0 {
            return Err(AllocError::EmptyPool(category.to_string()));
        }
        let pool = self.pools.entry(category.to_string()).or_default();
        if pool.size != size {
            // A resized category cannot keep a permutation of the old range.
            pool.remaining.clear();
            pool.size = size;
        }
        if pool.remaining.is_empty() {
            pool.remaining = (0..size).collect();
            pool.remaining.shuffle(rng);
            tracing::debug!(category, size, "pool reshuffled");
        }
        pool.remaining
            .pop()
            .ok_or_else(|| AllocError::EmptyPool(category.to_string()))
    }

    pub fn reset(&mut self, category: &str) {
        self.pools.remove(category);
    }

    /// Draws left before the category's current cycle is exhausted.
    pub fn remaining_in_cycle(&self, category: &str) -> usize {
        self.pools
            .get(category)
            .map(|pool| pool.remaining.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    #[test]
    fn each_cycle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sampler = PoolSampler::new();
        for _ in 0..5 {
            let cycle: BTreeSet<usize> = (0..4)
                .map(|_| sampler.draw("Cat", 4, &mut rng).expect("draw"))
                .collect();
            assert_eq!(cycle, (0..4).collect::<BTreeSet<_>>());
        }
    }

    #[test]
    fn draws_across_cycle_boundary_only_repeat_after_exhaustion() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut sampler = PoolSampler::new();
        let draws: Vec<usize> = (0..5)
            .map(|_| sampler.draw("Cat", 3, &mut rng).expect("draw"))
            .collect();
        let first: BTreeSet<usize> = draws[..3].iter().copied().collect();
        assert_eq!(first, BTreeSet::from([0, 1, 2]));
        assert_ne!(draws[3], draws[4]);
        assert!(draws[3..].iter().all(|index| *index < 3));
        assert_eq!(sampler.remaining_in_cycle("Cat"), 1);
    }

    #[test]
    fn empty_pool_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sampler = PoolSampler::new();
        assert_eq!(
            sampler.draw("Nothing", 0, &mut rng),
            Err(AllocError::EmptyPool("Nothing".to_string()))
        );
    }

    #[test]
    fn categories_are_independent_and_resettable() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sampler = PoolSampler::new();
        sampler.draw("A", 3, &mut rng).expect("draw a");
        sampler.draw("B", 2, &mut rng).expect("draw b");
        assert_eq!(sampler.remaining_in_cycle("A"), 2);
        assert_eq!(sampler.remaining_in_cycle("B"), 1);
        sampler.reset("A");
        assert_eq!(sampler.remaining_in_cycle("A"), 0);
        assert_eq!(sampler.remaining_in_cycle("B"), 1);
    }

    #[test]
    fn single_item_pool_always_yields_zero() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut sampler = PoolSampler::new();
        for _ in 0..4 {
            assert_eq!(sampler.draw("Solo", 1, &mut rng), Ok(0));
        }
    }
}
