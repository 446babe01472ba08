use crate::areas::repository::Repository;
use crate::artifacts::core::error::Result;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use std::path::Path;
use tracing::instrument;

impl Repository {
    /// Hash a working-tree file as a blob, storing it when `write` is set
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn hash_object(&self, path: impl AsRef<Path>, write: bool) -> Result<ObjectId> {
        let relative_path = self.workspace().relative_path(path.as_ref())?;
        let blob = self.workspace().parse_blob(&relative_path)?;

        if write {
            self.database().store(&blob)
        } else {
            blob.object_id()
        }
    }
}
