use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::config::Config;
use crate::artifacts::core::error::{Error, Result};
use std::path::Path;
use tracing::{info, instrument};

impl Repository {
    /// Create the private area at `path`, or reopen it if it already exists
    ///
    /// Existing HEAD, refs, objects and index are left untouched.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn init(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let default_branch = BranchName::try_parse(config.default_branch.clone())
            .map_err(|e| Error::Config(e.to_string()))?;
        let repository = Self::assemble(path.as_ref(), config)?;

        repository.database().init()?;
        repository.refs().init()?;
        repository.stash().init()?;

        if !repository.refs().head_path().exists() {
            if !repository.refs().branch_exists(&default_branch) {
                repository.refs().create_branch(&default_branch, None)?;
            }
            repository.refs().set_current_branch(&default_branch)?;
        }

        let index = repository.index();
        let index = index.lock();
        if !index.path().exists() {
            index.write_updates()?;
        }
        drop(index);

        info!(path = %repository.path().display(), "initialized repository");
        Ok(repository)
    }
}
