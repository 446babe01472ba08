//! Branch and tag references plus HEAD
//!
//! ## File Format
//!
//! - `HEAD` holds `ref: refs/heads/<branch>`; HEAD always names a branch
//! - `refs/heads/<branch>` holds a 40-character commit id, or nothing for a
//!   branch without commits
//! - `refs/tags/<tag>` holds a 40-character commit id
//!
//! Every write replaces the whole file through a temporary file and a rename,
//! so a concurrent reader sees either the old or the new value.

use crate::artifacts::branch::RefKind;
use crate::artifacts::branch::branch_name::{BranchName, TagName};
use crate::artifacts::core::atomic_file::{self, TEMP_FILE_PREFIX};
use crate::artifacts::core::error::{Error, IoContext, Result};
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::info;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

static SYMREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SYMREF_REGEX).expect("symref pattern compiles"));

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository's private directory (typically `.twig`)
    path: Box<Path>,
}

impl Refs {
    /// Create the refs directories
    pub fn init(&self) -> Result<()> {
        for kind in [RefKind::Branch, RefKind::Tag] {
            let dir = self.kind_path(kind);
            std::fs::create_dir_all(&dir)
                .io_context(|| format!("Unable to create refs directory {}", dir.display()))?;
        }

        Ok(())
    }

    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.branch_path(name).is_file()
    }

    /// Tip of a branch; `None` when the branch has no commits yet
    pub fn read_branch(&self, name: &BranchName) -> Result<Option<ObjectId>> {
        let path = self.branch_path(name);
        if !path.is_file() {
            return Err(Error::UnknownBranch(name.to_string()));
        }

        Self::read_ref_file(&path)
    }

    /// Move an existing branch to a new commit
    pub fn write_branch(&self, name: &BranchName, oid: &ObjectId) -> Result<()> {
        if !self.branch_exists(name) {
            return Err(Error::UnknownBranch(name.to_string()));
        }

        atomic_file::write_atomically(&self.branch_path(name), oid.as_ref().as_bytes())?;
        info!(branch = %name, commit = %oid, "moved branch");

        Ok(())
    }

    pub fn create_branch(&self, name: &BranchName, oid: Option<&ObjectId>) -> Result<()> {
        if self.branch_exists(name) {
            return Err(Error::AlreadyExists {
                kind: RefKind::Branch,
                name: name.to_string(),
            });
        }

        let content = oid.map(|oid| oid.as_ref().as_bytes()).unwrap_or_default();
        atomic_file::write_atomically(&self.branch_path(name), content)?;
        info!(branch = %name, commit = ?oid.map(ObjectId::to_string), "created branch");

        Ok(())
    }

    /// Delete a branch that is not checked out, returning its former tip
    pub fn delete_branch(&self, name: &BranchName) -> Result<Option<ObjectId>> {
        if &self.current_branch()? == name {
            return Err(Error::IsActiveBranch(name.to_string()));
        }

        let oid = self.read_branch(name)?;
        let path = self.branch_path(name);
        std::fs::remove_file(&path)
            .io_context(|| format!("failed to delete branch file at {}", path.display()))?;
        self.prune_empty_parent_dirs(&path, &self.kind_path(RefKind::Branch))?;
        info!(branch = %name, "deleted branch");

        Ok(oid)
    }

    /// Branch names in sorted order
    pub fn list_branches(&self) -> Result<Vec<BranchName>> {
        self.list_refs(RefKind::Branch)?
            .into_iter()
            .map(BranchName::try_parse)
            .collect()
    }

    /// Branch named by HEAD
    pub fn current_branch(&self) -> Result<BranchName> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .io_context(|| format!("failed to read HEAD at {}", head_path.display()))?;

        let caps = SYMREF
            .captures(content.trim())
            .ok_or_else(|| Error::corrupt("HEAD", format!("not a branch reference: {content:?}")))?;

        BranchName::try_parse(&caps[1]).map_err(|e| Error::corrupt("HEAD", e))
    }

    pub fn set_current_branch(&self, name: &BranchName) -> Result<()> {
        if !self.branch_exists(name) {
            return Err(Error::UnknownBranch(name.to_string()));
        }

        atomic_file::write_atomically(
            &self.head_path(),
            format!("ref: refs/heads/{name}\n").as_bytes(),
        )?;
        info!(branch = %name, "switched HEAD");

        Ok(())
    }

    pub fn tag_exists(&self, name: &TagName) -> bool {
        self.tag_path(name).is_file()
    }

    pub fn read_tag(&self, name: &TagName) -> Result<ObjectId> {
        let path = self.tag_path(name);
        if !path.is_file() {
            return Err(Error::UnknownTag(name.to_string()));
        }

        Self::read_ref_file(&path)?
            .ok_or_else(|| Error::corrupt(format!("tag {name}"), "empty tag file"))
    }

    pub fn create_tag(&self, name: &TagName, oid: &ObjectId) -> Result<()> {
        if self.tag_exists(name) {
            return Err(Error::AlreadyExists {
                kind: RefKind::Tag,
                name: name.to_string(),
            });
        }

        atomic_file::write_atomically(&self.tag_path(name), oid.as_ref().as_bytes())?;
        info!(tag = %name, commit = %oid, "created tag");

        Ok(())
    }

    pub fn delete_tag(&self, name: &TagName) -> Result<ObjectId> {
        let oid = self.read_tag(name)?;
        let path = self.tag_path(name);
        std::fs::remove_file(&path)
            .io_context(|| format!("failed to delete tag file at {}", path.display()))?;
        self.prune_empty_parent_dirs(&path, &self.kind_path(RefKind::Tag))?;
        info!(tag = %name, "deleted tag");

        Ok(oid)
    }

    /// Tag names in sorted order
    pub fn list_tags(&self) -> Result<Vec<TagName>> {
        self.list_refs(RefKind::Tag)?
            .into_iter()
            .map(TagName::try_parse)
            .collect()
    }

    fn read_ref_file(path: &Path) -> Result<Option<ObjectId>> {
        let content = std::fs::read_to_string(path)
            .io_context(|| format!("failed to read ref file at {}", path.display()))?;
        let content = content.trim();

        if content.is_empty() {
            Ok(None)
        } else {
            ObjectId::try_parse(content)
                .map(Some)
                .map_err(|e| Error::corrupt(format!("ref {}", path.display()), e))
        }
    }

    fn list_refs(&self, kind: RefKind) -> Result<Vec<String>> {
        let base = self.kind_path(kind);
        let mut names = WalkDir::new(&base)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                !entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with(TEMP_FILE_PREFIX)
            })
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&base).ok()?;
                Some(
                    relative_path
                        .components()
                        .map(|component| component.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/"),
                )
            })
            .collect::<Vec<_>>();
        names.sort();

        Ok(names)
    }

    fn prune_empty_parent_dirs(&self, path: &Path, root: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && parent != root
            && parent
                .read_dir()
                .io_context(|| format!("failed to read directory {}", parent.display()))?
                .next()
                .is_none()
        {
            std::fs::remove_dir(parent).io_context(|| {
                format!("failed to remove empty ref directory at {}", parent.display())
            })?;
            self.prune_empty_parent_dirs(parent, root)?;
        }

        Ok(())
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    fn kind_path(&self, kind: RefKind) -> PathBuf {
        self.path.join("refs").join(kind.directory())
    }

    fn branch_path(&self, name: &BranchName) -> PathBuf {
        self.kind_path(RefKind::Branch).join(name.as_ref())
    }

    fn tag_path(&self, name: &TagName) -> PathBuf {
        self.kind_path(RefKind::Tag).join(name.as_ref())
    }
}
