use crate::areas::repository::Repository;
use crate::artifacts::core::error::{Error, Result};
use tracing::instrument;

impl Repository {
    /// Save the staged mapping and clear the index, returning the stash id
    #[instrument(skip(self))]
    pub fn stash_push(&self) -> Result<String> {
        let index = self.index();
        let mut index = index.lock();

        if index.is_empty() {
            return Err(Error::NothingToCommit);
        }

        let id = self.stash().push(index.entries())?;
        index.clear();
        index.write_updates()?;

        Ok(id)
    }

    /// Restore the newest stash into the index; stashed entries win
    ///
    /// The entry is dropped only after the merged index is on disk.
    #[instrument(skip(self))]
    pub fn stash_pop(&self) -> Result<String> {
        let index = self.index();
        let mut index = index.lock();
        let (id, stashed) = self.stash().latest()?;

        let previous = index.entries().clone();
        let mut merged = previous.clone();
        merged.extend(stashed);
        index.set_entries(merged);

        if let Err(error) = index.write_updates() {
            index.set_entries(previous);
            return Err(error);
        }
        self.stash().remove(&id)?;

        Ok(id)
    }

    /// Stash ids, oldest first
    pub fn stash_list(&self) -> Result<Vec<String>> {
        self.stash().list()
    }
}
