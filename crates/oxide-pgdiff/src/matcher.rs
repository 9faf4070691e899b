//! Identity merge-matcher.
//!
//! Classifies two identity-sorted snapshots into objects that only exist in
//! the old one (dropped), only in the new one (created), and in both
//! (common), with a single two-cursor pass.

use std::cmp::Ordering;

use tracing::debug;

use crate::catalog::CatalogItem;
use crate::snapshot::Snapshot;

/// Result of matching two snapshots.
#[derive(Debug)]
pub struct Matched<'a, T> {
    /// Objects only in the old snapshot.
    pub dropped: Vec<&'a T>,
    /// Objects only in the new snapshot.
    pub created: Vec<&'a T>,
    /// Identity-matched `(old, new)` pairs, in the new snapshot's order.
    pub common: Vec<(&'a T, &'a T)>,
}

impl<T> Matched<'_, T> {
    /// Returns true if nothing was dropped or created.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.dropped.is_empty() && self.created.is_empty()
    }
}

/// Matches `old` against `new` by identity.
///
/// Both snapshots are sorted and duplicate-free by construction, so one
/// merge pass is enough.
#[must_use]
pub fn match_snapshots<'a, T: CatalogItem>(
    old: &'a Snapshot<T>,
    new: &'a Snapshot<T>,
) -> Matched<'a, T> {
    let matched = merge_by_key(old.items(), new.items(), T::key);
    debug!(
        kind = %T::KIND,
        dropped = matched.dropped.len(),
        created = matched.created.len(),
        common = matched.common.len(),
        "Matched snapshots"
    );
    matched
}

/// Two-cursor merge of two slices sorted by `key`.
pub fn merge_by_key<'a, T, K, F>(old: &'a [T], new: &'a [T], key: F) -> Matched<'a, T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut matched = Matched {
        dropped: Vec::new(),
        created: Vec::new(),
        common: Vec::new(),
    };

    let (mut i, mut j) = (0, 0);
    while i < old.len() && j < new.len() {
        match key(&old[i]).cmp(&key(&new[j])) {
            Ordering::Less => {
                matched.dropped.push(&old[i]);
                i += 1;
            }
            Ordering::Greater => {
                matched.created.push(&new[j]);
                j += 1;
            }
            Ordering::Equal => {
                matched.common.push((&old[i], &new[j]));
                i += 1;
                j += 1;
            }
        }
    }
    matched.dropped.extend(&old[i..]);
    matched.created.extend(&new[j..]);

    matched
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn test_classifies_dropped_created_common() {
        let old = ["a", "c", "d", "f"];
        let new = ["b", "c", "e", "f", "g"];

        let m = merge_by_key(&old, &new, |s| *s);
        let dropped: Vec<&str> = m.dropped.iter().map(|s| **s).collect();
        let created: Vec<&str> = m.created.iter().map(|s| **s).collect();
        assert_eq!(dropped, vec!["a", "d"]);
        assert_eq!(created, vec!["b", "e", "g"]);
        let common: Vec<(&str, &str)> = m.common.iter().map(|(a, b)| (**a, **b)).collect();
        assert_eq!(common, vec![("c", "c"), ("f", "f")]);
    }

    #[test]
    fn test_empty_sides() {
        let items = ["a", "b"];
        let none: [&str; 0] = [];

        let m = merge_by_key(&none, &items, |s| *s);
        assert_eq!(m.created.len(), 2);
        assert!(m.dropped.is_empty() && m.common.is_empty());

        let m = merge_by_key(&items, &none, |s| *s);
        assert_eq!(m.dropped.len(), 2);
        assert!(m.created.is_empty() && m.common.is_empty());
    }

    #[test]
    fn test_self_match_is_balanced() {
        let items = ["a", "b", "c"];
        let m = merge_by_key(&items, &items, |s| *s);
        assert!(m.is_balanced());
        assert_eq!(m.common.len(), 3);
    }

    #[test]
    fn test_partition_covers_union_exactly_once() {
        // A small deterministic family of sorted inputs.
        let universe = ["a", "b", "c", "d", "e", "f"];
        for mask_a in 0u32..64 {
            for mask_b in (0u32..64).step_by(7) {
                let old: Vec<&str> = pick(&universe, mask_a);
                let new: Vec<&str> = pick(&universe, mask_b);
                let m = merge_by_key(&old, &new, |s| *s);

                let dropped: BTreeSet<&str> = m.dropped.iter().map(|s| **s).collect();
                let created: BTreeSet<&str> = m.created.iter().map(|s| **s).collect();
                let common: Vec<&str> = m.common.iter().map(|(a, _)| **a).collect();
                let common_set: BTreeSet<&str> = common.iter().copied().collect();

                assert_eq!(common.len(), common_set.len());
                assert!(dropped.is_disjoint(&created));
                assert!(dropped.is_disjoint(&common_set));
                assert!(created.is_disjoint(&common_set));

                let mut union: BTreeSet<&str> = old.iter().copied().collect();
                union.extend(new.iter().copied());
                let mut covered = dropped.clone();
                covered.extend(&created);
                covered.extend(&common_set);
                assert_eq!(covered, union);

                let both: BTreeSet<&str> =
                    old.iter().copied().filter(|s| new.contains(s)).collect();
                assert_eq!(common_set, both);
            }
        }
    }

    fn pick<'a>(universe: &[&'a str], mask: u32) -> Vec<&'a str> {
        universe
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, s)| *s)
            .collect()
    }
}
