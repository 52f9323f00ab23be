//! Order-preserving collection helpers.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

/// Sort direction for [`sort_by_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Removes repeated values, keeping the first occurrence of each.
pub fn dedup<T: Eq + Hash + Clone>(items: &[T]) -> Vec<T> {
    dedup_by_key(items, |item| item.clone())
}

/// Removes items whose key was already seen, keeping first occurrences.
pub fn dedup_by_key<T: Clone, K: Eq + Hash>(items: &[T], key: impl Fn(&T) -> K) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(key(item)))
        .cloned()
        .collect()
}

/// Stable sort by key in the requested direction; returns a new vector.
pub fn sort_by_key<T: Clone, K: Ord>(
    items: &[T],
    key: impl Fn(&T) -> K,
    direction: SortDirection,
) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = key(a).cmp(&key(b));
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    sorted
}

/// `Ordering` helper placing `None` after every `Some`.
pub fn none_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(left), Some(right)) => left.cmp(right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
