use rand::Rng;

/// Draws up to `count` elements from `pool` uniformly at random without
/// replacement. The output is in draw order, not pool order.
pub fn draw_winners<T>(mut pool: Vec<T>, count: usize) -> Vec<T> {
    let mut rng = rand::thread_rng();
    let mut winners = Vec::with_capacity(count.min(pool.len()));
    while winners.len() < count && !pool.is_empty() {
        let index = rng.gen_range(0..pool.len());
        winners.push(pool.swap_remove(index));
    }
    winners
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::draw_winners;

    #[test]
    fn empty_pool_draws_nothing() {
        let winners = draw_winners(Vec::<u64>::new(), 3);
        assert!(winners.is_empty());
    }

    #[test]
    fn zero_count_draws_nothing() {
        let winners = draw_winners(vec![1_u64, 2, 3], 0);
        assert!(winners.is_empty());
    }

    #[test]
    fn draws_exactly_count_distinct_elements() {
        let pool: Vec<u64> = (0..100).collect();
        let winners = draw_winners(pool.clone(), 5);

        assert_eq!(winners.len(), 5);
        let unique: HashSet<u64> = winners.iter().copied().collect();
        assert_eq!(unique.len(), 5);
        assert!(winners.iter().all(|winner| pool.contains(winner)));
    }

    #[test]
    fn count_above_pool_size_drains_the_pool() {
        let winners = draw_winners(vec![1_u64, 2, 3], 10);

        assert_eq!(winners.len(), 3);
        let unique: HashSet<u64> = winners.iter().copied().collect();
        assert_eq!(unique, HashSet::from([1, 2, 3]));
    }
}
