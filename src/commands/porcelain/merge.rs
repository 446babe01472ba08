use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::merge::three_way::ThreeWayMerge;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The source tip is already part of the current history
    UpToDate,
    /// The current branch now points at the source tip
    Moved(ObjectId),
}

impl Repository {
    /// Merge `source` into the branch HEAD names
    pub fn merge(&self, source: &str) -> Result<MergeOutcome> {
        let current = self.refs().current_branch()?;
        self.merge_branches(current.as_ref(), source)
    }

    /// Three-way merge of `source` into `current`
    ///
    /// Every path of the ancestor, current and source trees is classified.
    /// Any conflict aborts the merge with the full list of conflicting paths
    /// and leaves all refs untouched. A clean merge moves `current` to the
    /// source tip.
    #[instrument(skip(self))]
    pub fn merge_branches(&self, current: &str, source: &str) -> Result<MergeOutcome> {
        let current = BranchName::try_parse(current)?;
        let source = BranchName::try_parse(source)?;

        let source_tip = self
            .refs()
            .read_branch(&source)?
            .ok_or_else(|| Error::EmptyBranch(source.to_string()))?;
        let no_common_ancestor = || Error::NoCommonAncestor {
            left: current.to_string(),
            right: source.to_string(),
        };
        let current_tip = self
            .refs()
            .read_branch(&current)?
            .ok_or_else(no_common_ancestor)?;

        let history = self.history();
        let ancestor = history
            .common_ancestor(&current_tip, &source_tip)?
            .ok_or_else(no_common_ancestor)?;
        debug!(ancestor = %ancestor, "found common ancestor");

        let ancestor_tree = self.commit_tree(&ancestor)?;
        let current_tree = self.commit_tree(&current_tip)?;
        let source_tree = self.commit_tree(&source_tip)?;
        ThreeWayMerge::new(&ancestor_tree, &current_tree, &source_tree).ensure_clean()?;

        if history.is_ancestor(&source_tip, &current_tip)? {
            info!(branch = %current, "already up to date");
            return Ok(MergeOutcome::UpToDate);
        }

        self.refs().write_branch(&current, &source_tip)?;
        info!(branch = %current, source = %source, commit = %source_tip, "merged");

        Ok(MergeOutcome::Moved(source_tip))
    }

    pub(crate) fn commit_tree(&self, commit_oid: &ObjectId) -> Result<Arc<Tree>> {
        let commit = self.database().load_commit(commit_oid)?;
        self.database().load_tree(commit.tree_oid())
    }
}
