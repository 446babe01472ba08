//! Saved staged-file mappings
//!
//! Each stash entry is one file under `stash/`, named by a zero-padded
//! microsecond timestamp so that lexical order is creation order. Files use
//! the index format.

use crate::areas::index::{Index, StagedEntry};
use crate::artifacts::core::atomic_file::{self, TEMP_FILE_PREFIX};
use crate::artifacts::core::error::{Error, IoContext, Result};
use derive_new::new;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, new)]
pub struct Stash {
    /// Path to the stash directory (typically `.twig/stash`)
    path: Box<Path>,
}

impl Stash {
    pub fn init(&self) -> Result<()> {
        std::fs::create_dir_all(&self.path)
            .io_context(|| format!("Unable to create stash directory {}", self.path.display()))
    }

    /// Save a mapping as the newest entry, returning its id
    pub fn push(&self, entries: &BTreeMap<String, StagedEntry>) -> Result<String> {
        let latest = self.list()?.pop();
        let mut micros = chrono::Utc::now().timestamp_micros().max(0);

        let id = loop {
            let id = format!("{micros:020}");
            if latest.as_ref().is_none_or(|latest| &id > latest) && !self.entry_path(&id).exists() {
                break id;
            }
            micros += 1;
        };

        atomic_file::write_atomically(&self.entry_path(&id), Index::render(entries).as_bytes())?;
        info!(stash = %id, entries = entries.len(), "saved stash");

        Ok(id)
    }

    /// Read the newest entry without removing it
    pub fn latest(&self) -> Result<(String, BTreeMap<String, StagedEntry>)> {
        let id = self.list()?.pop().ok_or(Error::EmptyStash)?;
        let path = self.entry_path(&id);

        let content = std::fs::read_to_string(&path)
            .io_context(|| format!("Unable to read stash entry {}", path.display()))?;

        Ok((id, Index::parse(&content)?))
    }

    /// Drop an entry once its content has been restored elsewhere
    pub fn remove(&self, id: &str) -> Result<()> {
        let path = self.entry_path(id);
        std::fs::remove_file(&path)
            .io_context(|| format!("Unable to delete stash entry {}", path.display()))?;
        info!(stash = %id, "dropped stash");

        Ok(())
    }

    /// Entry ids, oldest first
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.path.is_dir() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        let entries = std::fs::read_dir(&self.path)
            .io_context(|| format!("Unable to list stash directory {}", self.path.display()))?;
        for entry in entries {
            let name = entry?.file_name().to_string_lossy().to_string();
            if !name.starts_with(TEMP_FILE_PREFIX) {
                ids.push(name);
            }
        }
        ids.sort();

        Ok(ids)
    }

    fn entry_path(&self, id: &str) -> PathBuf {
        self.path.join(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_id::ObjectId;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    fn mapping(path: &str, n: u8) -> BTreeMap<String, StagedEntry> {
        let oid = ObjectId::try_parse(format!("{n:040x}")).unwrap();
        BTreeMap::from([(path.to_string(), StagedEntry::Blob(oid))])
    }

    #[test]
    fn reads_newest_first_until_removed() {
        let dir = TempDir::new().unwrap();
        let stash = Stash::new(dir.path().join("stash").into_boxed_path());
        stash.init().unwrap();

        let first = stash.push(&mapping("a", 1)).unwrap();
        let second = stash.push(&mapping("b", 2)).unwrap();

        assert_eq!(stash.list().unwrap(), vec![first.clone(), second.clone()]);
        assert_eq!(stash.latest().unwrap(), (second.clone(), mapping("b", 2)));
        assert_eq!(stash.latest().unwrap().0, second, "reading keeps the entry");

        stash.remove(&second).unwrap();
        assert_eq!(stash.latest().unwrap(), (first.clone(), mapping("a", 1)));

        stash.remove(&first).unwrap();
        assert!(matches!(stash.latest(), Err(Error::EmptyStash)));
    }
}
