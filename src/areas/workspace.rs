use crate::areas::repository::REPOSITORY_DIR;
use crate::artifacts::core::error::{Error, IoContext, Result};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::tree::validate_path;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Repository-relative, `/`-separated form of a user-supplied path
    ///
    /// Relative paths are taken relative to the workspace root. Paths that
    /// escape the workspace or point into the private area are rejected.
    pub fn relative_path(&self, path: &Path) -> Result<String> {
        let invalid = || Error::InvalidPath(path.display().to_string());

        let relative = if path.is_absolute() {
            path.strip_prefix(&self.path).map_err(|_| invalid())?
        } else {
            path
        };

        let mut components = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => components.push(name.to_string_lossy().to_string()),
                Component::CurDir => {}
                _ => return Err(invalid()),
            }
        }

        if components.first().map(String::as_str) == Some(REPOSITORY_DIR) {
            return Err(invalid());
        }

        let relative = components.join("/");
        validate_path(&relative).map_err(|_| invalid())?;

        Ok(relative)
    }

    /// Whether a user-supplied path names the workspace root itself
    pub fn is_root(&self, path: &Path) -> bool {
        if path.is_absolute() {
            return path == &*self.path;
        }

        path.components().all(|component| component == Component::CurDir)
    }

    pub fn exists(&self, relative_path: &str) -> bool {
        self.path.join(relative_path).exists()
    }

    pub fn is_dir(&self, relative_path: &str) -> bool {
        self.path.join(relative_path).is_dir()
    }

    pub fn parse_blob(&self, relative_path: &str) -> Result<Blob> {
        Ok(Blob::new(self.read_file(relative_path)?))
    }

    pub fn read_file(&self, relative_path: &str) -> Result<Vec<u8>> {
        let file_path = self.path.join(relative_path);

        std::fs::read(&file_path)
            .io_context(|| format!("Unable to read file {}", file_path.display()))
    }

    pub fn remove_file(&self, relative_path: &str) -> Result<()> {
        let file_path = self.path.join(relative_path);

        if file_path.is_file() {
            std::fs::remove_file(&file_path)
                .io_context(|| format!("Unable to remove file {}", file_path.display()))?;
        }

        Ok(())
    }

    /// Files under a workspace directory, repository-relative and sorted
    pub fn list_files(&self, relative_dir: &str) -> Result<Vec<String>> {
        let root = self.path.join(relative_dir);

        let mut files = WalkDir::new(&root)
            .into_iter()
            .filter_entry(|entry| !Self::is_private_area(entry.path(), &self.path))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&self.path).ok()?;
                self.relative_path(relative_path).ok()
            })
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    /// Copy the working tree (without the private area) into `destination`
    pub fn copy_working_tree(&self, destination: &Path) -> Result<usize> {
        let root = &self.path;
        Self::copy_dir(root, destination, |path| !Self::is_private_area(path, root))
    }

    /// Copy the private area byte-for-byte into `destination`
    pub fn copy_private_area(&self, destination: &Path) -> Result<usize> {
        Self::copy_dir(&self.path.join(REPOSITORY_DIR), destination, |_| true)
    }

    fn copy_dir(source: &Path, destination: &Path, include: impl Fn(&Path) -> bool) -> Result<usize> {
        let mut copied = 0;

        for entry in WalkDir::new(source)
            .into_iter()
            .filter_entry(|entry| include(entry.path()))
        {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                Error::io(
                    format!("Unable to walk {}", path.display()),
                    e.into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
                )
            })?;

            let relative_path = entry
                .path()
                .strip_prefix(source)
                .map_err(|_| Error::InvalidPath(entry.path().display().to_string()))?;
            let target: PathBuf = destination.join(relative_path);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&target)
                    .io_context(|| format!("Unable to create directory {}", target.display()))?;
            } else if entry.file_type().is_file() {
                std::fs::copy(entry.path(), &target).io_context(|| {
                    format!(
                        "Unable to copy {} to {}",
                        entry.path().display(),
                        target.display()
                    )
                })?;
                copied += 1;
            }
        }

        Ok(copied)
    }

    fn is_private_area(path: &Path, root: &Path) -> bool {
        path.strip_prefix(root)
            .ok()
            .and_then(|relative| relative.components().next())
            .is_some_and(|component| component.as_os_str() == REPOSITORY_DIR)
    }
}
