//! Priorities that reproduce the local order on load.
//!
//! Activities and details come back from the service sorted by
//! `(priority, label)`, labels compared case-insensitively. After a local
//! insert or move, [`plan`] picks the priority changes under which that
//! sort returns the local order.
//!
//! # Strategy
//!
//! | Situation | Changes |
//! |-----------|---------|
//! | one priority in `0..=MAX_PRIORITY` fits between the neighbours | the placed entry only |
//! | no single priority fits, or the others are out of order | every entry renumbered to its index |
//! | more than `MAX_PRIORITY + 1` entries need renumbering | none possible |

use std::cmp::Ordering;

use super::snapshot::label_cmp;

/// Highest priority the event service accepts.
pub const MAX_PRIORITY: i32 = 255;

/// Sort key of one entry as the service sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey<'a> {
    pub priority: i32,
    pub label: &'a str,
}

impl<'a> OrderKey<'a> {
    pub fn new(priority: i32, label: &'a str) -> Self {
        Self { priority, label }
    }

    fn load_cmp(&self, other: &OrderKey<'_>) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| label_cmp(self.label, other.label))
    }
}

/// Priority changes, as `(index, priority)`, after which `keys` loads in
/// its current order with `keys[placed]` at `placed`.
///
/// Returns `None` when no assignment within `0..=MAX_PRIORITY` exists.
pub fn plan(keys: &[OrderKey<'_>], placed: usize) -> Option<Vec<(usize, i32)>> {
    let Some(key) = keys.get(placed) else {
        return Some(Vec::new());
    };

    let others: Vec<&OrderKey<'_>> = keys
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != placed)
        .map(|(_, k)| k)
        .collect();
    let others_ordered = others
        .windows(2)
        .all(|pair| pair[0].load_cmp(pair[1]) == Ordering::Less);

    if others_ordered {
        if let Some(priority) = fit(keys, placed) {
            return Some(if priority == key.priority {
                Vec::new()
            } else {
                vec![(placed, priority)]
            });
        }
    }
    renumber(keys)
}

/// A priority for `keys[placed]` that sorts strictly between its
/// neighbours.
fn fit(keys: &[OrderKey<'_>], placed: usize) -> Option<i32> {
    let key = keys[placed];
    let prev = placed.checked_sub(1).and_then(|i| keys.get(i)).copied();
    let next = keys.get(placed + 1).copied();

    // Equal priorities fall back to the label, so a tie is allowed when
    // the label already sorts the right way.
    let lo = match prev {
        None => 0,
        Some(p) if label_cmp(key.label, p.label) == Ordering::Greater => p.priority,
        Some(p) => p.priority.saturating_add(1),
    };
    let hi = match next {
        None => MAX_PRIORITY,
        Some(n) if label_cmp(key.label, n.label) == Ordering::Less => n.priority,
        Some(n) => n.priority.saturating_sub(1),
    };
    let range = lo.max(0)..=hi.min(MAX_PRIORITY);

    [
        Some(key.priority),
        prev.map(|p| p.priority.saturating_add(1)),
        next.map(|n| n.priority.saturating_sub(1)),
        Some(*range.start()),
    ]
    .into_iter()
    .flatten()
    .find(|p| range.contains(p))
}

fn renumber(keys: &[OrderKey<'_>]) -> Option<Vec<(usize, i32)>> {
    if keys.len() > MAX_PRIORITY as usize + 1 {
        return None;
    }
    Some(
        keys.iter()
            .enumerate()
            .filter(|(i, k)| k.priority != *i as i32)
            .map(|(i, _)| (i, i as i32))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sorts `keys` with `changes` applied, the way a load would.
    fn reload<'a>(keys: &[OrderKey<'a>], changes: &[(usize, i32)]) -> Vec<&'a str> {
        let mut keys = keys.to_vec();
        for &(i, p) in changes {
            keys[i].priority = p;
        }
        keys.sort_by(|a, b| a.load_cmp(b));
        keys.into_iter().map(|k| k.label).collect()
    }

    #[test]
    fn test_append_goes_after_last() {
        let keys = [
            OrderKey::new(0, "Setup"),
            OrderKey::new(1, "Teardown"),
            OrderKey::new(0, "Aardvark"),
        ];
        let changes = plan(&keys, 2).unwrap();
        assert_eq!(changes, vec![(2, 2)]);
        assert_eq!(reload(&keys, &changes), vec!["Setup", "Teardown", "Aardvark"]);
    }

    #[test]
    fn test_already_in_place() {
        let keys = [OrderKey::new(0, "A"), OrderKey::new(3, "B")];
        assert_eq!(plan(&keys, 1).unwrap(), vec![]);
    }

    #[test]
    fn test_label_tie_allowed() {
        // "Phone" sorts before "Shirt", so sharing priority 0 is enough.
        let keys = [OrderKey::new(1, "Phone"), OrderKey::new(0, "Shirt")];
        let changes = plan(&keys, 0).unwrap();
        assert_eq!(changes, vec![(0, 0)]);
        assert_eq!(reload(&keys, &changes), vec!["Phone", "Shirt"]);
    }

    #[test]
    fn test_no_room_renumbers() {
        // "Teardown" cannot go below priority 0 ahead of "Setup".
        let keys = [OrderKey::new(1, "Teardown"), OrderKey::new(0, "Setup")];
        let changes = plan(&keys, 0).unwrap();
        assert_eq!(changes, vec![(0, 0), (1, 1)]);
        assert_eq!(reload(&keys, &changes), vec!["Teardown", "Setup"]);
    }

    #[test]
    fn test_unordered_neighbours_renumber() {
        // The first two already load swapped.
        let keys = [
            OrderKey::new(0, "b"),
            OrderKey::new(0, "a"),
            OrderKey::new(9, "c"),
        ];
        let changes = plan(&keys, 2).unwrap();
        assert_eq!(reload(&keys, &changes), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_case_insensitive_labels() {
        let keys = [OrderKey::new(4, "apple"), OrderKey::new(4, "Banana")];
        assert_eq!(plan(&keys, 1).unwrap(), vec![]);
    }

    #[test]
    fn test_exhausted() {
        let labels: Vec<String> = (0..=MAX_PRIORITY + 1).map(|i| format!("x{i:03}")).collect();
        let mut keys: Vec<OrderKey<'_>> = labels
            .iter()
            .map(|l| OrderKey::new(0, l))
            .collect();
        // Last label to the front: nothing sorts below priority 0 and
        // renumbering runs past the maximum.
        keys.rotate_right(1);
        assert_eq!(plan(&keys, 0), None);
    }
}
