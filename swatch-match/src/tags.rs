//! Tag hierarchy checks for access-scoping selections
//!
//! Tags form a directed graph where a tag may have several parents. A valid
//! selection never contains both a tag and one of its ancestors, since the
//! ancestor already covers the descendant.
//!
//! Upstream data errors can introduce cycles. Traversals keep a visited set
//! and treat a revisit as a dead end, so they always terminate.
//!
//! Conflict detection compares all pairs: O(n² · depth) for n selected tags,
//! fine for selections of a few dozen tags.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use swatch_common::{Error, Result};
use tracing::debug;
use uuid::Uuid;

pub type TagId = Uuid;

/// Two selected tags where one is an ancestor of the other
///
/// `first` precedes `second` in the selection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagConflict {
    pub first: TagId,
    pub second: TagId,
}

impl From<TagConflict> for Error {
    fn from(conflict: TagConflict) -> Self {
        Error::ConflictDetected {
            first: conflict.first,
            second: conflict.second,
        }
    }
}

/// Tag to parent-tags adjacency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagHierarchy {
    parents: HashMap<TagId, Vec<TagId>>,
}

impl TagHierarchy {
    pub fn new(parents: HashMap<TagId, Vec<TagId>>) -> Self {
        Self { parents }
    }

    /// Add a parent edge
    pub fn add_parent(&mut self, tag: TagId, parent: TagId) {
        self.parents.entry(tag).or_default().push(parent);
    }

    pub fn parents_of(&self, tag: TagId) -> &[TagId] {
        parents_in(&self.parents, tag)
    }

    /// True if `ancestor` is reachable from `descendant` via parent edges
    pub fn is_ancestor(&self, descendant: TagId, ancestor: TagId) -> bool {
        is_ancestor_in(&self.parents, descendant, ancestor)
    }

    /// Every tag reachable from `tag` via parent edges
    ///
    /// Contains `tag` itself only if the graph has a cycle through it.
    pub fn ancestors(&self, tag: TagId) -> HashSet<TagId> {
        let mut visited = HashSet::new();
        let mut stack: Vec<TagId> = self.parents_of(tag).to_vec();

        while let Some(current) = stack.pop() {
            if visited.insert(current) {
                stack.extend(self.parents_of(current).iter().copied());
            }
        }
        visited
    }

    /// First pair of selected tags in an ancestor/descendant relationship
    ///
    /// Pairs are examined in input order: (0, 1), (0, 2), ..., (1, 2), ...
    /// Repeated occurrences of the same id are not a conflict.
    pub fn find_conflict(&self, selected: &[TagId]) -> Option<TagConflict> {
        find_conflict_in(&self.parents, selected)
    }
}

fn parents_in(parents: &HashMap<TagId, Vec<TagId>>, tag: TagId) -> &[TagId] {
    parents.get(&tag).map(Vec::as_slice).unwrap_or(&[])
}

fn is_ancestor_in(parents: &HashMap<TagId, Vec<TagId>>, descendant: TagId, ancestor: TagId) -> bool {
    let mut visited = HashSet::new();
    let mut stack: Vec<TagId> = parents_in(parents, descendant).to_vec();

    while let Some(tag) = stack.pop() {
        if tag == ancestor {
            return true;
        }
        if !visited.insert(tag) {
            continue;
        }
        stack.extend(parents_in(parents, tag).iter().copied());
    }
    false
}

fn find_conflict_in(parents: &HashMap<TagId, Vec<TagId>>, selected: &[TagId]) -> Option<TagConflict> {
    for (i, &first) in selected.iter().enumerate() {
        for &second in &selected[i + 1..] {
            if first == second {
                continue;
            }
            if is_ancestor_in(parents, first, second) || is_ancestor_in(parents, second, first) {
                debug!(%first, %second, "Tag selection conflict");
                return Some(TagConflict { first, second });
            }
        }
    }
    None
}

/// Check a proposed selection against a parent map
pub fn validate_tag_selection(
    selected: &[TagId],
    parents_by_tag: &HashMap<TagId, Vec<TagId>>,
) -> Option<TagConflict> {
    find_conflict_in(parents_by_tag, selected)
}

/// A validated tag selection
///
/// Every mutation is checked against the hierarchy before it is committed; a
/// rejected change leaves the selection as it was and reports the pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagSelection {
    ids: Vec<TagId>,
}

impl TagSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection, rejecting conflicting input
    pub fn from_ids(ids: Vec<TagId>, hierarchy: &TagHierarchy) -> Result<Self> {
        let mut selection = Self::new();
        selection.try_replace(ids, hierarchy)?;
        Ok(selection)
    }

    pub fn ids(&self) -> &[TagId] {
        &self.ids
    }

    pub fn contains(&self, id: TagId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Add one tag; already-selected tags are a no-op
    pub fn try_insert(&mut self, id: TagId, hierarchy: &TagHierarchy) -> Result<()> {
        if self.contains(id) {
            return Ok(());
        }
        let mut proposed = self.ids.clone();
        proposed.push(id);
        if let Some(conflict) = hierarchy.find_conflict(&proposed) {
            return Err(conflict.into());
        }
        self.ids = proposed;
        Ok(())
    }

    /// Replace the whole selection
    pub fn try_replace(&mut self, ids: Vec<TagId>, hierarchy: &TagHierarchy) -> Result<()> {
        let mut deduped = Vec::with_capacity(ids.len());
        for id in ids {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        if let Some(conflict) = hierarchy.find_conflict(&deduped) {
            return Err(conflict.into());
        }
        self.ids = deduped;
        Ok(())
    }

    /// Remove a tag; removal can never introduce a conflict
    pub fn remove(&mut self, id: TagId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|t| *t != id);
        self.ids.len() != before
    }
}
