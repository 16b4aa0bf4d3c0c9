use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::interface::MoveKey;

/// Every move a search explored, level by level.
///
/// Keys keep the order they were first recorded in, so printing a tree twice
/// gives the same output. The tree is a by-product of a search and never feeds
/// back into which move is chosen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveTree {
    entries: Vec<(MoveKey, MoveTree)>,
}

impl MoveTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tree with a single explored move and whatever was explored below it.
    pub fn single(key: MoveKey, subtree: MoveTree) -> Self {
        Self {
            entries: vec![(key, subtree)],
        }
    }

    /// Record a move explored by an exhaustive scan of one level.
    pub fn record(&mut self, key: MoveKey, subtree: MoveTree) {
        debug_assert!(
            !self.contains(key),
            "move key {} recorded twice at one level",
            key
        );
        self.entries.push((key, subtree));
    }

    /// Fold another tree into this one. Shared keys merge their subtrees.
    pub fn merge(&mut self, other: MoveTree) {
        for (key, subtree) in other.entries {
            match self.entries.iter_mut().find(|(k, _)| *k == key) {
                Some((_, existing)) => existing.merge(subtree),
                None => self.entries.push((key, subtree)),
            }
        }
    }

    pub fn get(&self, key: MoveKey) -> Option<&MoveTree> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, subtree)| subtree)
    }

    pub fn contains(&self, key: MoveKey) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = MoveKey> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MoveKey, &MoveTree)> + '_ {
        self.entries.iter().map(|(k, t)| (*k, t))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded moves at every depth.
    pub fn node_count(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, subtree)| 1 + subtree.node_count())
            .sum()
    }

    /// True if every key at every level of `self` also appears at the same
    /// place in `other`.
    pub fn is_subset_of(&self, other: &MoveTree) -> bool {
        self.entries.iter().all(|(key, subtree)| match other.get(*key) {
            Some(theirs) => subtree.is_subset_of(theirs),
            None => false,
        })
    }
}

// Nested object keyed by the move key text, the shape a tree visualizer reads.
impl Serialize for MoveTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, subtree) in &self.entries {
            map.serialize_entry(&key.to_string(), subtree)?;
        }
        map.end()
    }
}
