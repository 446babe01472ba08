use crate::areas::repository::{REPOSITORY_DIR, Repository};
use crate::artifacts::core::config::Config;
use crate::artifacts::core::error::{Error, Result};
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneSummary {
    /// Files copied from the working tree
    pub working_files: usize,
    /// Files copied from the private area
    pub private_files: usize,
}

impl Repository {
    /// Duplicate a repository with its working tree and full history
    #[instrument(skip_all, fields(source = %source.as_ref().display(), destination = %destination.as_ref().display()))]
    pub fn clone_repository(
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
        config: Config,
    ) -> Result<(Repository, CloneSummary)> {
        let source = Repository::open(source, config.clone())?;
        let destination = destination.as_ref();
        if Self::is_repository(destination) {
            return Err(Error::RepositoryExists(destination.to_path_buf()));
        }

        let working_files = source.workspace().copy_working_tree(destination)?;
        let private_files = source
            .workspace()
            .copy_private_area(&destination.join(REPOSITORY_DIR))?;
        info!(working_files, private_files, "cloned repository");

        let cloned = Repository::open(destination, config)?;

        Ok((
            cloned,
            CloneSummary {
                working_files,
                private_files,
            },
        ))
    }
}
