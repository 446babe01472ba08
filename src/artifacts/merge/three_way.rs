//! Per-path three-way classification
//!
//! For every path present in the ancestor, current or source tree, the blob
//! ids on each side are compared (an absent path compares as `None`):
//!
//! | current == source | ancestor == current | ancestor == source | result        |
//! |-------------------|---------------------|--------------------|---------------|
//! | yes               | -                   | -                  | `Unchanged`   |
//! | no                | yes                 | -                  | `TakeSource`  |
//! | no                | no                  | yes                | `KeepCurrent` |
//! | no                | no                  | no                 | `Conflict`    |
//!
//! Deletions are ordinary values here: a path deleted on both sides is
//! unchanged, and a deletion on one side against an untouched other side is
//! taken without conflict.

use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathResolution {
    /// Both sides agree
    Unchanged,
    /// Only the source side changed the path
    TakeSource,
    /// Only the current side changed the path
    KeepCurrent,
    /// Both sides changed the path differently
    Conflict,
}

impl PathResolution {
    pub fn classify(
        ancestor: Option<&ObjectId>,
        current: Option<&ObjectId>,
        source: Option<&ObjectId>,
    ) -> Self {
        if current == source {
            PathResolution::Unchanged
        } else if ancestor == current {
            PathResolution::TakeSource
        } else if ancestor == source {
            PathResolution::KeepCurrent
        } else {
            PathResolution::Conflict
        }
    }
}

/// The three trees taking part in a merge
#[derive(Debug, Clone, Copy)]
pub struct ThreeWayMerge<'t> {
    ancestor: &'t Tree,
    current: &'t Tree,
    source: &'t Tree,
}

impl<'t> ThreeWayMerge<'t> {
    pub fn new(ancestor: &'t Tree, current: &'t Tree, source: &'t Tree) -> Self {
        Self {
            ancestor,
            current,
            source,
        }
    }

    /// Resolution of every path present in any of the three trees, sorted by path
    pub fn resolutions(&self) -> BTreeMap<&'t str, PathResolution> {
        let paths = self
            .ancestor
            .paths()
            .chain(self.current.paths())
            .chain(self.source.paths())
            .map(String::as_str)
            .collect::<BTreeSet<_>>();

        paths
            .into_iter()
            .map(|path| {
                let resolution = PathResolution::classify(
                    self.ancestor.get(path),
                    self.current.get(path),
                    self.source.get(path),
                );
                (path, resolution)
            })
            .collect()
    }

    /// Every conflicting path, sorted
    pub fn conflicts(&self) -> Vec<String> {
        self.resolutions()
            .into_iter()
            .filter(|(_, resolution)| *resolution == PathResolution::Conflict)
            .map(|(path, _)| path.to_string())
            .collect()
    }

    /// Fail with the complete conflict set, if any
    pub fn ensure_clean(&self) -> Result<()> {
        let paths = self.conflicts();
        if paths.is_empty() {
            Ok(())
        } else {
            Err(Error::MergeConflict { paths })
        }
    }
}
