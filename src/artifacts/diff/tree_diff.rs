use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use bitflags::bitflags;
use std::collections::BTreeMap;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct DiffFilter: u32 {
        const ADDED = 0b0001;
        const DELETED = 0b0010;
        const MODIFIED = 0b0100;
    }
}

impl DiffFilter {
    /// Parse status letters such as `AD` or `M`
    pub fn try_parse(s: &str) -> Option<Self> {
        let mut filter = Self::empty();

        for c in s.chars() {
            match c {
                'A' => filter |= Self::ADDED,
                'D' => filter |= Self::DELETED,
                'M' => filter |= Self::MODIFIED,
                _ => return None,
            }
        }

        Some(filter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeChange {
    /// Path only in the new tree
    Added(ObjectId),
    /// Path only in the old tree
    Deleted(ObjectId),
    /// Path in both trees with differing blobs
    Modified { old: ObjectId, new: ObjectId },
}

impl TreeChange {
    pub fn from_entries(old: Option<&ObjectId>, new: Option<&ObjectId>) -> Option<Self> {
        match (old, new) {
            (None, Some(new)) => Some(TreeChange::Added(new.clone())),
            (Some(old), None) => Some(TreeChange::Deleted(old.clone())),
            (Some(old), Some(new)) if old != new => Some(TreeChange::Modified {
                old: old.clone(),
                new: new.clone(),
            }),
            _ => None,
        }
    }

    pub fn matches_filter(&self, filter: DiffFilter) -> bool {
        match self {
            TreeChange::Added(_) => filter.contains(DiffFilter::ADDED),
            TreeChange::Deleted(_) => filter.contains(DiffFilter::DELETED),
            TreeChange::Modified { .. } => filter.contains(DiffFilter::MODIFIED),
        }
    }

    pub fn old_oid(&self) -> Option<&ObjectId> {
        match self {
            TreeChange::Deleted(oid) => Some(oid),
            TreeChange::Modified { old, .. } => Some(old),
            TreeChange::Added(_) => None,
        }
    }

    pub fn new_oid(&self) -> Option<&ObjectId> {
        match self {
            TreeChange::Added(oid) => Some(oid),
            TreeChange::Modified { new, .. } => Some(new),
            TreeChange::Deleted(_) => None,
        }
    }

    pub fn status_char(&self) -> char {
        match self {
            TreeChange::Added(_) => 'A',
            TreeChange::Deleted(_) => 'D',
            TreeChange::Modified { .. } => 'M',
        }
    }
}

pub type ChangeSet = BTreeMap<String, TreeChange>;

/// Path-level differences between two trees, ordered by path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeDiff {
    change_set: ChangeSet,
}

impl TreeDiff {
    pub fn compare(old: &Tree, new: &Tree) -> Self {
        let mut change_set = ChangeSet::new();

        for (path, oid) in old.entries() {
            if let Some(change) = TreeChange::from_entries(Some(oid), new.get(path)) {
                change_set.insert(path.clone(), change);
            }
        }

        for (path, oid) in new.entries() {
            if !old.contains(path) {
                change_set.insert(path.clone(), TreeChange::Added(oid.clone()));
            }
        }

        TreeDiff { change_set }
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.change_set
    }

    pub fn is_empty(&self) -> bool {
        self.change_set.is_empty()
    }

    /// Keep only the changes whose status is in `filter`
    pub fn retain(&mut self, filter: DiffFilter) {
        self.change_set
            .retain(|_, change| change.matches_filter(filter));
    }

    pub fn into_changes(self) -> ChangeSet {
        self.change_set
    }
}
