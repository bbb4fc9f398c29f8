//! Frequency counting with a deterministic "most common" pick.

use std::collections::BTreeMap;

use serde::Serialize;

// ── Popular ───────────────────────────────────────────────────────────────────

/// A value together with how many records carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popular<T> {
    pub value: T,
    pub count: usize,
}

impl<T> Popular<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Popular<U> {
        Popular {
            value: f(self.value),
            count: self.count,
        }
    }
}

// ── Tally ─────────────────────────────────────────────────────────────────────

/// Occurrence counts keyed in sorted order.
///
/// Ties for the highest count resolve to the smallest key, so results do not
/// depend on the order values were added in.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    counts: BTreeMap<K, usize>,
}

impl<K: Ord> Default for Tally<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<K: Ord> Tally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`.
    pub fn add(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    /// The key with the highest count; the smallest such key on a tie.
    /// `None` when nothing was counted.
    pub fn most_common(&self) -> Option<Popular<&K>> {
        let mut best: Option<(&K, usize)> = None;
        for (key, &count) in &self.counts {
            // Strictly greater keeps the earliest key among equals.
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((key, count));
            }
        }
        best.map(|(value, count)| Popular { value, count })
    }
}

impl<K: Ord> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_common_picks_highest_count() {
        let tally: Tally<u32> = [8, 17, 17, 9, 17, 8].into_iter().collect();
        let top = tally.most_common().unwrap();
        assert_eq!(*top.value, 17);
        assert_eq!(top.count, 3);
    }

    #[test]
    fn test_most_common_tie_takes_smallest_key() {
        let tally: Tally<&str> = ["Clark St", "Adams St", "Clark St", "Adams St"]
            .into_iter()
            .collect();
        let top = tally.most_common().unwrap();
        assert_eq!(*top.value, "Adams St");
        assert_eq!(top.count, 2);
    }

    #[test]
    fn test_most_common_tie_independent_of_insertion_order() {
        let forward: Tally<&str> = ["B", "A"].into_iter().collect();
        let backward: Tally<&str> = ["A", "B"].into_iter().collect();
        assert_eq!(forward.most_common(), backward.most_common());
    }

    #[test]
    fn test_most_common_empty() {
        let tally: Tally<u32> = Tally::new();
        assert!(tally.most_common().is_none());
    }

    #[test]
    fn test_directed_pairs_counted_separately() {
        let tally: Tally<(&str, &str)> = [("B", "A"), ("A", "B"), ("B", "A")]
            .into_iter()
            .collect();
        let top = tally.most_common().unwrap();
        assert_eq!(*top.value, ("B", "A"));
        assert_eq!(top.count, 2);
    }

    #[test]
    fn test_popular_map() {
        let popular = Popular {
            value: 3u32,
            count: 7,
        };
        let mapped = popular.map(|v| v * 2);
        assert_eq!(mapped.value, 6);
        assert_eq!(mapped.count, 7);
    }
}
