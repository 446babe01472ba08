use crate::areas::repository::Repository;
use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::object_id::ObjectId;
use std::path::Path;
use tracing::{debug, instrument};

impl Repository {
    /// Store each file as a blob and stage it; directories are expanded
    ///
    /// Returns the staged `(path, blob id)` pairs in staging order.
    #[instrument(skip_all, fields(count = paths.len()))]
    pub fn add<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<(String, ObjectId)>> {
        let mut files = Vec::new();
        for path in paths {
            if self.workspace().is_root(path.as_ref()) {
                files.extend(self.workspace().list_files("")?);
                continue;
            }

            let relative = self.workspace().relative_path(path.as_ref())?;

            if self.workspace().is_dir(&relative) {
                files.extend(self.workspace().list_files(&relative)?);
            } else if self.workspace().exists(&relative) {
                files.push(relative);
            } else {
                return Err(Error::InvalidPath(relative));
            }
        }

        let index = self.index();
        let mut index = index.lock();

        let mut staged = Vec::with_capacity(files.len());
        for file in files {
            let blob = self.workspace().parse_blob(&file)?;
            let blob_id = self.database().store(&blob)?;
            debug!(path = %file, blob = %blob_id, "staged file");

            index.stage(file.clone(), blob_id.clone())?;
            staged.push((file, blob_id));
        }

        index.write_updates()?;

        Ok(staged)
    }
}
