//! Staged-file mapping
//!
//! The index records what the next commit changes relative to its parent:
//! a path is either staged with a blob id or marked deleted.
//!
//! ## Index File Format
//!
//! One entry per line, sorted by path:
//! - `<40-hex blob id> <path>` for a staged blob
//! - `- <path>` for a deletion

use crate::artifacts::core::atomic_file;
use crate::artifacts::core::error::{Error, IoContext, Result};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, validate_path};
use std::collections::BTreeMap;
use std::path::Path;

const DELETION_MARKER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedEntry {
    Blob(ObjectId),
    Deleted,
}

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.twig/index`)
    path: Box<Path>,
    entries: BTreeMap<String, StagedEntry>,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index from disk; a missing file is an empty index
    pub fn rehydrate(&mut self) -> Result<()> {
        self.entries.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.path)
            .io_context(|| format!("Unable to read index file {}", self.path.display()))?;
        self.entries = Self::parse(&content)?;

        Ok(())
    }

    /// Persist the current entries
    pub fn write_updates(&self) -> Result<()> {
        atomic_file::write_atomically(&self.path, Self::render(&self.entries).as_bytes())
    }

    pub fn stage(&mut self, path: impl Into<String>, oid: ObjectId) -> Result<()> {
        let path = path.into();
        validate_path(&path)?;
        self.entries.insert(path, StagedEntry::Blob(oid));

        Ok(())
    }

    pub fn mark_deleted(&mut self, path: impl Into<String>) -> Result<()> {
        let path = path.into();
        validate_path(&path)?;
        self.entries.insert(path, StagedEntry::Deleted);

        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&StagedEntry> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> &BTreeMap<String, StagedEntry> {
        &self.entries
    }

    /// Replace the entries wholesale
    pub fn set_entries(&mut self, entries: BTreeMap<String, StagedEntry>) {
        self.entries = entries;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Apply the staged delta on top of `base`
    pub fn apply_to(&self, base: &Tree) -> Result<Tree> {
        let mut tree = base.clone();
        for (path, entry) in &self.entries {
            match entry {
                StagedEntry::Blob(oid) => {
                    tree.insert(path.clone(), oid.clone())?;
                }
                StagedEntry::Deleted => {
                    tree.remove(path);
                }
            }
        }

        Ok(tree)
    }

    pub fn parse(content: &str) -> Result<BTreeMap<String, StagedEntry>> {
        let mut entries = BTreeMap::new();

        for line in content.split('\n').filter(|line| !line.is_empty()) {
            let (head, path) = line
                .split_once(' ')
                .ok_or_else(|| Error::corrupt("index", format!("malformed line {line:?}")))?;
            validate_path(path).map_err(|e| Error::corrupt("index", e))?;

            let entry = if head == DELETION_MARKER {
                StagedEntry::Deleted
            } else {
                StagedEntry::Blob(ObjectId::try_parse(head).map_err(|e| Error::corrupt("index", e))?)
            };
            entries.insert(path.to_string(), entry);
        }

        Ok(entries)
    }

    pub fn render(entries: &BTreeMap<String, StagedEntry>) -> String {
        entries
            .iter()
            .map(|(path, entry)| match entry {
                StagedEntry::Blob(oid) => format!("{oid} {path}\n"),
                StagedEntry::Deleted => format!("{DELETION_MARKER} {path}\n"),
            })
            .collect()
    }
}
