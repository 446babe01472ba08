//! Ancestor enumeration and common-ancestor search
//!
//! ## Algorithm
//!
//! `ancestors` is a breadth-first walk over parent links. Every commit has at
//! most one parent, so the frontier never holds more than one entry, but the
//! walk keeps an explicit visited set and stops at the first revisit. A parent
//! chain that loops back on itself (which well-formed stores never produce)
//! therefore terminates instead of spinning forever.
//!
//! `common_ancestor` returns the first commit in `ancestors(a)` traversal order
//! that also belongs to `ancestors(b)`. For single-parent histories this is the
//! lowest common ancestor; callers must not rely on minimality beyond that.

use crate::artifacts::core::error::Result;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Result of an ancestor walk: traversal order plus a membership index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ancestry {
    order: Vec<ObjectId>,
    members: HashSet<ObjectId>,
}

impl Ancestry {
    fn visit(&mut self, oid: ObjectId) -> bool {
        if self.members.insert(oid.clone()) {
            self.order.push(oid);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.members.contains(oid)
    }

    /// Commits in the order the walk reached them, starting commit first
    pub fn iter(&self) -> impl Iterator<Item = &ObjectId> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_order(self) -> Vec<ObjectId> {
        self.order
    }
}

/// Traversals over a commit graph described by a parent loader
///
/// `ParentLoaderFn` maps a commit id to its parent id (`None` for a root) and
/// fails with `NotFound` when the commit is missing from storage.
#[derive(Debug, Clone)]
pub struct HistoryGraph<ParentLoaderFn>
where
    ParentLoaderFn: Fn(&ObjectId) -> Result<Option<ObjectId>>,
{
    parent_loader: ParentLoaderFn,
}

impl<ParentLoaderFn> HistoryGraph<ParentLoaderFn>
where
    ParentLoaderFn: Fn(&ObjectId) -> Result<Option<ObjectId>>,
{
    pub fn new(parent_loader: ParentLoaderFn) -> Self {
        Self { parent_loader }
    }

    /// Every commit reachable from `start` through parent links, `start` included
    pub fn ancestors(&self, start: &ObjectId) -> Result<Ancestry> {
        let mut ancestry = Ancestry::default();
        let mut queue = VecDeque::from([start.clone()]);

        while let Some(oid) = queue.pop_front() {
            if !ancestry.visit(oid.clone()) {
                debug!(commit = %oid, "revisited commit, stopping walk");
                continue;
            }

            if let Some(parent) = (self.parent_loader)(&oid)? {
                queue.push_back(parent);
            }
        }

        debug!(start = %start, count = ancestry.len(), "collected ancestors");
        Ok(ancestry)
    }

    /// First ancestor of `left`, in traversal order, that is also an ancestor of `right`
    pub fn common_ancestor(&self, left: &ObjectId, right: &ObjectId) -> Result<Option<ObjectId>> {
        let left_ancestors = self.ancestors(left)?;
        let right_ancestors = self.ancestors(right)?;

        let common = left_ancestors
            .iter()
            .find(|oid| right_ancestors.contains(oid))
            .cloned();

        debug!(left = %left, right = %right, common = ?common, "common ancestor search");
        Ok(common)
    }

    /// Whether `ancestor` is reachable from `descendant` (a commit reaches itself)
    pub fn is_ancestor(&self, ancestor: &ObjectId, descendant: &ObjectId) -> Result<bool> {
        Ok(self.ancestors(descendant)?.contains(ancestor))
    }

    /// Commits after `ancestor` up to and including `tip`, oldest first
    ///
    /// Empty when `tip` equals `ancestor` or never reaches it.
    pub fn commits_between(&self, ancestor: &ObjectId, tip: &ObjectId) -> Result<Vec<ObjectId>> {
        let mut collected = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(tip.clone());

        while let Some(oid) = current {
            if &oid == ancestor {
                collected.reverse();
                return Ok(collected);
            }
            if !visited.insert(oid.clone()) {
                break;
            }

            current = (self.parent_loader)(&oid)?;
            collected.push(oid);
        }

        debug!(ancestor = %ancestor, tip = %tip, "tip does not reach ancestor");
        Ok(Vec::new())
    }
}
