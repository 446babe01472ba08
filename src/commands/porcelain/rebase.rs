use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::object_id::ObjectId;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebaseOutcome {
    /// No commits are unique to the current branch
    NothingToRebase,
    Rebased {
        new_tip: ObjectId,
        /// Replayed commits, oldest first
        replayed: Vec<ObjectId>,
    },
}

impl Repository {
    /// Rebase the branch HEAD names onto `target`
    pub fn rebase(&self, target: &str) -> Result<RebaseOutcome> {
        let current = self.refs().current_branch()?;
        self.rebase_branches(current.as_ref(), target)
    }

    /// Replay the commits unique to `current` on top of `target`'s tip
    ///
    /// Replayed commits keep their tree, message and author but get a fresh
    /// timestamp and a new parent. The ref is written once, after every
    /// replayed commit is stored; a failure midway leaves the branch untouched.
    #[instrument(skip(self))]
    pub fn rebase_branches(&self, current: &str, target: &str) -> Result<RebaseOutcome> {
        let current = BranchName::try_parse(current)?;
        let target = BranchName::try_parse(target)?;

        let target_tip = self
            .refs()
            .read_branch(&target)?
            .ok_or_else(|| Error::EmptyBranch(target.to_string()))?;
        let no_common_ancestor = || Error::NoCommonAncestor {
            left: current.to_string(),
            right: target.to_string(),
        };
        let current_tip = self
            .refs()
            .read_branch(&current)?
            .ok_or_else(no_common_ancestor)?;

        let history = self.history();
        let ancestor = history
            .common_ancestor(&current_tip, &target_tip)?
            .ok_or_else(no_common_ancestor)?;

        let unique = history.commits_between(&ancestor, &current_tip)?;
        if unique.is_empty() {
            info!(branch = %current, "nothing to rebase");
            return Ok(RebaseOutcome::NothingToRebase);
        }

        let mut new_parent = target_tip;
        let mut replayed = Vec::with_capacity(unique.len());
        for oid in &unique {
            let original = self.database().load_commit(oid)?;
            let replica = original.replayed_onto(new_parent);
            new_parent = self.database().store(&replica)?;
            debug!(original = %oid, replayed = %new_parent, "replayed commit");
            replayed.push(new_parent.clone());
        }

        self.refs().write_branch(&current, &new_parent)?;
        info!(branch = %current, onto = %target, commits = replayed.len(), "rebased");

        Ok(RebaseOutcome::Rebased {
            new_tip: new_parent,
            replayed,
        })
    }
}
