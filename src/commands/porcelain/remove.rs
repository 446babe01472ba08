use crate::areas::index::StagedEntry;
use crate::areas::repository::Repository;
use crate::artifacts::core::error::{Error, Result};
use std::path::Path;
use tracing::{debug, instrument};

impl Repository {
    /// Stage the deletion of a tracked file and remove it from the working tree
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn remove(&self, path: impl AsRef<Path>) -> Result<String> {
        let relative = self.workspace().relative_path(path.as_ref())?;

        let index = self.index();
        let mut index = index.lock();

        let staged = matches!(index.get(&relative), Some(StagedEntry::Blob(_)));
        if !staged && !self.is_tracked(&relative)? {
            return Err(Error::InvalidPath(format!("{relative} is not tracked")));
        }

        index.mark_deleted(relative.clone())?;
        index.write_updates()?;
        self.workspace().remove_file(&relative)?;
        debug!(path = %relative, "staged deletion");

        Ok(relative)
    }

    /// Whether the current branch tip's tree contains `path`
    fn is_tracked(&self, path: &str) -> Result<bool> {
        let branch = self.refs().current_branch()?;
        match self.refs().read_branch(&branch)? {
            Some(tip) => Ok(self.commit_tree(&tip)?.contains(path)),
            None => Ok(false),
        }
    }
}
