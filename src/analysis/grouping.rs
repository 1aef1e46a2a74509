//! Shared group-by primitive
//!
//! Every breakdown, ranking and the export summary go through [`group_fold`],
//! so first-seen ordering and percentage rounding are identical everywhere.

use indexmap::IndexMap;
use std::hash::Hash;

/// Fold items into per-key accumulators, keeping keys in first-seen order.
pub fn group_fold<K, T, A, I, F>(items: I, init: impl Fn() -> A, mut fold: F) -> IndexMap<K, A>
where
    K: Hash + Eq,
    I: IntoIterator<Item = (K, T)>,
    F: FnMut(&mut A, T),
{
    let mut groups: IndexMap<K, A> = IndexMap::new();
    for (key, item) in items {
        fold(groups.entry(key).or_insert_with(&init), item);
    }
    groups
}

/// Count occurrences of each key, sorted by count descending.
///
/// The sort is stable, so keys with equal counts stay in first-seen order.
pub fn count_by<K, I>(keys: I) -> Vec<(K, usize)>
where
    K: Hash + Eq,
    I: IntoIterator<Item = K>,
{
    let groups = group_fold(keys.into_iter().map(|k| (k, ())), || 0usize, |n, ()| *n += 1);
    let mut counts: Vec<(K, usize)> = groups.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// `100 * count / total`, defined as 0.0 when `total` is zero.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 * 100.0 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_by_breaks_ties_on_first_seen() {
        let counts = count_by(["b", "a", "c", "a", "b", "d"]);
        assert_eq!(counts, vec![("b", 2), ("a", 2), ("c", 1), ("d", 1)]);
    }

    #[test]
    fn test_count_by_empty() {
        let counts = count_by(Vec::<&str>::new());
        assert!(counts.is_empty());
    }

    #[test]
    fn test_group_fold_accumulates() {
        let groups = group_fold(
            vec![("x", 1i64), ("y", 5), ("x", 3)],
            || (0usize, 0i64),
            |acc, v| {
                acc.0 += 1;
                acc.1 += v;
            },
        );
        assert_eq!(groups.get_index(0), Some((&"x", &(2, 4))));
        assert_eq!(groups.get_index(1), Some((&"y", &(1, 5))));
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
        assert!((percentage(1, 3) - 33.333).abs() < 0.001);
    }
}
