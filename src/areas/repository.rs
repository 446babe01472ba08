use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::stash::Stash;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::config::Config;
use crate::artifacts::core::error::{Error, IoContext, Result};
use crate::artifacts::history::HistoryGraph;
use crate::artifacts::objects::object_id::ObjectId;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the private directory at the repository root
pub const REPOSITORY_DIR: &str = ".twig";

#[derive(Debug)]
pub struct Repository {
    path: Box<Path>,
    config: Config,
    index: Arc<Mutex<Index>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    stash: Stash,
}

impl Repository {
    /// Open an existing repository rooted at `path`
    pub fn open(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let path = path.as_ref();
        if !Self::is_repository(path) {
            return Err(Error::NotInitialized(path.to_path_buf()));
        }

        Self::assemble(path, config)
    }

    /// Whether `path` holds a private repository directory
    pub fn is_repository(path: &Path) -> bool {
        path.join(REPOSITORY_DIR).is_dir()
    }

    pub(crate) fn assemble(path: &Path, config: Config) -> Result<Self> {
        config.validate()?;

        std::fs::create_dir_all(path)
            .io_context(|| format!("Unable to create directory {}", path.display()))?;
        let path = path
            .canonicalize()
            .io_context(|| format!("Unable to resolve path {}", path.display()))?;
        let private = path.join(REPOSITORY_DIR);

        let mut index = Index::new(private.join("index").into_boxed_path());
        index.rehydrate()?;

        Ok(Repository {
            index: Arc::new(Mutex::new(index)),
            database: Database::new(private.join("objects").into_boxed_path(), &config),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs: Refs::new(private.clone().into_boxed_path()),
            stash: Stash::new(private.join("stash").into_boxed_path()),
            path: path.into_boxed_path(),
            config,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn private_path(&self) -> PathBuf {
        self.path.join(REPOSITORY_DIR)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn stash(&self) -> &Stash {
        &self.stash
    }

    /// Commit graph backed by this repository's object store
    pub fn history(&self) -> HistoryGraph<impl Fn(&ObjectId) -> Result<Option<ObjectId>> + '_> {
        HistoryGraph::new(|oid: &ObjectId| Ok(self.database.load_commit(oid)?.parent().cloned()))
    }
}
