use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::core::error::Result;
use crate::artifacts::diff::line_diff::ContentDiff;
use crate::artifacts::diff::tree_diff::{DiffFilter, TreeChange, TreeDiff};
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: String,
    pub change: TreeChange,
    pub content: ContentDiff,
}

impl Repository {
    /// Changes from the commit `old` names to the commit `new` names
    ///
    /// Files are reported in path order. Added and deleted files are compared
    /// against empty content.
    #[instrument(skip(self))]
    pub fn diff(&self, old: &str, new: &str, filter: Option<DiffFilter>) -> Result<Vec<FileDiff>> {
        let old_oid = Revision::try_parse(old)?.resolve(self)?;
        let new_oid = Revision::try_parse(new)?.resolve(self)?;

        let old_tree = self.commit_tree(&old_oid)?;
        let new_tree = self.commit_tree(&new_oid)?;

        let mut tree_diff = TreeDiff::compare(&old_tree, &new_tree);
        if let Some(filter) = filter {
            tree_diff.retain(filter);
        }

        tree_diff
            .into_changes()
            .into_iter()
            .map(|(path, change)| {
                let old_content = self.blob_content(change.old_oid())?;
                let new_content = self.blob_content(change.new_oid())?;

                Ok(FileDiff {
                    content: ContentDiff::compare(&old_content, &new_content),
                    path,
                    change,
                })
            })
            .collect()
    }

    fn blob_content(&self, oid: Option<&ObjectId>) -> Result<Bytes> {
        match oid {
            Some(oid) => Ok(self.database().load_blob(oid)?.content().clone()),
            None => Ok(Bytes::new()),
        }
    }
}
