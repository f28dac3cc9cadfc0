//! Content-based deduplication of citation entries.

use std::collections::HashSet;
use std::hash::Hash;

/// Drop content-equal duplicates, keeping the first occurrence of each.
///
/// Survivors keep their relative input order. The returned references are
/// the input entries themselves; nothing is cloned. A dropped entry's key and
/// app tag are simply discarded along with it.
pub fn deduplicate<'a, C>(entries: impl IntoIterator<Item = &'a mut C>) -> Vec<&'a mut C>
where
    C: Eq + Hash + 'a,
{
    let entries: Vec<&'a mut C> = entries.into_iter().collect();
    let total = entries.len();

    let keep: Vec<bool> = {
        let mut seen: HashSet<&C> = HashSet::with_capacity(total);
        entries.iter().map(|entry| seen.insert(&**entry)).collect()
    };

    let unique: Vec<&'a mut C> = entries
        .into_iter()
        .zip(keep)
        .filter_map(|(entry, first)| first.then_some(entry))
        .collect();

    if unique.len() < total {
        tracing::debug!(
            "Dropped {} duplicate entries ({} -> {})",
            total - unique.len(),
            total,
            unique.len()
        );
    }

    unique
}
