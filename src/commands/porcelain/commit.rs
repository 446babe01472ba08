use crate::areas::index::StagedEntry;
use crate::areas::repository::Repository;
use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use tracing::{info, instrument};

impl Repository {
    /// Record the staged changes on top of the current branch tip
    ///
    /// The staged mapping is applied as a delta to the parent's tree, the
    /// resulting tree and commit are stored, the branch moves to the new
    /// commit and the index is cleared.
    #[instrument(skip(self))]
    pub fn commit(&self, message: &str) -> Result<ObjectId> {
        let index = self.index();
        let mut index = index.lock();

        if index.is_empty() {
            return Err(Error::NothingToCommit);
        }

        for entry in index.entries().values() {
            if let StagedEntry::Blob(oid) = entry
                && !self.database().contains(ObjectType::Blob, oid)
            {
                return Err(Error::NotFound {
                    kind: ObjectType::Blob,
                    oid: oid.clone(),
                });
            }
        }

        let branch = self.refs().current_branch()?;
        let parent = self.refs().read_branch(&branch)?;
        let base_tree = match &parent {
            Some(parent) => self.commit_tree(parent)?,
            None => Default::default(),
        };

        let tree: Tree = index.apply_to(&base_tree)?;
        let tree_oid = self.database().store(&tree)?;

        let commit = Commit::new(
            parent,
            tree_oid,
            self.config().author(),
            message.to_string(),
        );
        let commit_oid = self.database().store(&commit)?;
        self.refs().write_branch(&branch, &commit_oid)?;

        index.clear();
        index.write_updates()?;
        info!(branch = %branch, commit = %commit_oid, "committed");

        Ok(commit_oid)
    }
}
