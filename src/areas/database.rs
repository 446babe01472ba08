//! Object store
//!
//! Objects live under `objects/<kind partition>/<2 hex>/<38 hex>`, zlib
//! compressed. Every object is written once: storing content whose id is
//! already present leaves the existing file untouched.
//!
//! Reads go through one LRU cache per object kind. A cache miss reads the
//! file, checks the header kind, the declared length and the content hash,
//! then backfills the cache; a hit never touches the disk.

use crate::artifacts::core::atomic_file::{self, TEMP_FILE_PREFIX};
use crate::artifacts::core::cache::ObjectCache;
use crate::artifacts::core::config::Config;
use crate::artifacts::core::error::{Error, IoContext, Result};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use bytes::Bytes;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
    blobs: ObjectCache<Blob>,
    trees: ObjectCache<Tree>,
    commits: ObjectCache<Commit>,
}

impl Database {
    pub fn new(path: Box<Path>, config: &Config) -> Self {
        Database {
            path,
            blobs: ObjectCache::new(config.cache_capacity),
            trees: ObjectCache::new(config.cache_capacity),
            commits: ObjectCache::new(config.cache_capacity),
        }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Create the kind partitions
    pub fn init(&self) -> Result<()> {
        for kind in ObjectType::ALL {
            let partition = self.partition_path(kind);
            std::fs::create_dir_all(&partition)
                .io_context(|| format!("Unable to create object directory {}", partition.display()))?;
        }

        Ok(())
    }

    /// Persist an object unless an object with the same id already exists
    #[instrument(level = "debug", skip_all, fields(kind = %object.object_type()))]
    pub fn store(&self, object: &impl Object) -> Result<ObjectId> {
        let object_content = object.serialize()?;
        let oid = ObjectId::from_content(&object_content);
        let object_path = self.object_path(object.object_type(), &oid);

        if object_path.exists() {
            debug!(%oid, "object already stored");
            return Ok(oid);
        }

        atomic_file::write_atomically(&object_path, &Self::compress(&object_content)?)?;
        debug!(%oid, size = object_content.len(), "stored object");

        Ok(oid)
    }

    pub fn load_blob(&self, oid: &ObjectId) -> Result<Arc<Blob>> {
        self.load_cached(&self.blobs, ObjectType::Blob, oid)
    }

    pub fn load_tree(&self, oid: &ObjectId) -> Result<Arc<Tree>> {
        self.load_cached(&self.trees, ObjectType::Tree, oid)
    }

    pub fn load_commit(&self, oid: &ObjectId) -> Result<Arc<Commit>> {
        self.load_cached(&self.commits, ObjectType::Commit, oid)
    }

    /// Load an object of a known kind without going through the caches
    pub fn parse_object(&self, kind: ObjectType, oid: &ObjectId) -> Result<ObjectBox> {
        let object_reader = Cursor::new(self.read_payload(kind, oid)?);

        Ok(match kind {
            ObjectType::Blob => ObjectBox::Blob(Box::new(Blob::deserialize(object_reader)?)),
            ObjectType::Tree => ObjectBox::Tree(Box::new(Tree::deserialize(object_reader)?)),
            ObjectType::Commit => {
                ObjectBox::Commit(Box::new(Commit::deserialize(object_reader)?))
            }
        })
    }

    pub fn contains(&self, kind: ObjectType, oid: &ObjectId) -> bool {
        self.object_path(kind, oid).is_file()
    }

    /// Kind of the stored object with this id, if any
    pub fn kind_of(&self, oid: &ObjectId) -> Option<ObjectType> {
        ObjectType::ALL
            .into_iter()
            .find(|kind| self.contains(*kind, oid))
    }

    /// Every stored id of the given kind, sorted
    pub fn list(&self, kind: ObjectType) -> Result<Vec<ObjectId>> {
        let partition = self.partition_path(kind);
        let mut oids = WalkDir::new(&partition)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&partition).ok()?;
                let hex = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<String>();
                ObjectId::try_parse(hex).ok()
            })
            .collect::<Vec<_>>();
        oids.sort();

        Ok(oids)
    }

    /// Find all commits whose id starts with the given hex prefix
    ///
    /// Only the shard directory named by the first two characters is scanned,
    /// so the prefix must be at least two characters long.
    pub fn find_commits_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        let Some((dir_name, file_prefix)) = prefix.split_at_checked(2) else {
            return Ok(Vec::new());
        };

        let dir_path = self.partition_path(ObjectType::Commit).join(dir_name);
        if !dir_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        let entries = std::fs::read_dir(&dir_path)
            .io_context(|| format!("Unable to list object directory {}", dir_path.display()))?;
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();

            if file_name.starts_with(file_prefix)
                && !file_name.starts_with(TEMP_FILE_PREFIX)
                && let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}"))
            {
                matches.push(oid);
            }
        }
        matches.sort();

        Ok(matches)
    }

    fn load_cached<T: Unpackable>(
        &self,
        cache: &ObjectCache<T>,
        kind: ObjectType,
        oid: &ObjectId,
    ) -> Result<Arc<T>> {
        if let Some(object) = cache.get(oid) {
            debug!(%kind, %oid, "cache hit");
            return Ok(object);
        }

        debug!(%kind, %oid, "cache miss");
        let object = Arc::new(T::deserialize(Cursor::new(self.read_payload(kind, oid)?))?);
        cache.insert(oid.clone(), Arc::clone(&object));

        Ok(object)
    }

    /// Read, verify and strip the header of a stored object
    fn read_payload(&self, kind: ObjectType, oid: &ObjectId) -> Result<Bytes> {
        let object_path = self.object_path(kind, oid);

        let compressed = match std::fs::read(&object_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(match self.kind_of(oid) {
                    Some(actual) => Error::KindMismatch {
                        oid: oid.clone(),
                        expected: kind,
                        actual,
                    },
                    None => Error::NotFound {
                        kind,
                        oid: oid.clone(),
                    },
                });
            }
            Err(e) => {
                return Err(Error::io(
                    format!("Unable to read object file {}", object_path.display()),
                    e,
                ));
            }
        };

        let object_content = Self::decompress(&compressed)
            .map_err(|e| Error::corrupt(format!("object {oid}"), e))?;

        if &ObjectId::from_content(&object_content) != oid {
            return Err(Error::corrupt(format!("object {oid}"), "content hash mismatch"));
        }

        let mut object_reader = Cursor::new(object_content);
        let (actual, size) = ObjectType::parse_header(&mut object_reader)?;
        if actual != kind {
            return Err(Error::KindMismatch {
                oid: oid.clone(),
                expected: kind,
                actual,
            });
        }

        let header_len = object_reader.position() as usize;
        let object_content = object_reader.into_inner().slice(header_len..);
        if object_content.len() != size {
            return Err(Error::corrupt(
                format!("object {oid}"),
                format!("declared size {size}, found {}", object_content.len()),
            ));
        }

        Ok(object_content)
    }

    fn partition_path(&self, kind: ObjectType) -> PathBuf {
        self.path.join(kind.partition())
    }

    fn object_path(&self, kind: ObjectType, oid: &ObjectId) -> PathBuf {
        self.partition_path(kind).join(oid.to_path())
    }

    fn compress(data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(data)
            .io_context(|| "Unable to compress object content".to_string())?;

        encoder
            .finish()
            .io_context(|| "Unable to finish compressing object content".to_string())
    }

    fn decompress(data: &[u8]) -> std::io::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder.read_to_end(&mut decompressed_content)?;

        Ok(decompressed_content.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    struct Store {
        _dir: TempDir,
        database: Database,
    }

    #[fixture]
    fn store() -> Store {
        let dir = TempDir::new().unwrap();
        let database = Database::new(
            dir.path().join("objects").into_boxed_path(),
            &Config::default().with_cache_capacity(2).unwrap(),
        );
        database.init().unwrap();
        Store {
            _dir: dir,
            database,
        }
    }

    #[rstest]
    fn storing_twice_keeps_one_copy(store: Store) {
        let blob = Blob::new("same bytes");

        let first = store.database.store(&blob).unwrap();
        let second = store.database.store(&blob).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.database.list(ObjectType::Blob).unwrap(), vec![first]);
    }

    #[rstest]
    fn cache_hit_does_not_read_disk(store: Store) {
        let oid = store.database.store(&Blob::new("cached")).unwrap();
        let loaded = store.database.load_blob(&oid).unwrap();

        std::fs::remove_file(store.database.object_path(ObjectType::Blob, &oid)).unwrap();

        assert_eq!(store.database.load_blob(&oid).unwrap(), loaded);
        assert!(matches!(
            store.database.parse_object(ObjectType::Blob, &oid),
            Err(Error::NotFound { .. })
        ));
    }

    #[rstest]
    fn wrong_kind_is_reported(store: Store) {
        let oid = store.database.store(&Blob::new("not a tree")).unwrap();

        let result = store.database.load_tree(&oid);

        assert!(matches!(
            result,
            Err(Error::KindMismatch {
                expected: ObjectType::Tree,
                actual: ObjectType::Blob,
                ..
            })
        ));
    }

    #[rstest]
    fn tampered_content_is_corrupt(store: Store) {
        let oid = store.database.store(&Blob::new("original")).unwrap();
        let forged = Database::compress(b"blob 6\0forged").unwrap();
        std::fs::write(store.database.object_path(ObjectType::Blob, &oid), forged).unwrap();

        assert!(matches!(
            store.database.load_blob(&oid),
            Err(Error::Corrupt { .. })
        ));
    }

    #[rstest]
    fn prefix_search_only_sees_commits(store: Store) {
        let blob_oid = store.database.store(&Blob::new("payload")).unwrap();
        let tree_oid = store
            .database
            .store(&Tree::from_entries([("file", blob_oid.clone())]).unwrap())
            .unwrap();
        let author = Config::default().author();
        let commit_oid = store
            .database
            .store(&Commit::new(None, tree_oid, author, "first".into()))
            .unwrap();

        let by_commit_prefix = store
            .database
            .find_commits_by_prefix(&commit_oid.as_ref()[..6])
            .unwrap();
        let by_blob_prefix = store
            .database
            .find_commits_by_prefix(&blob_oid.as_ref()[..6])
            .unwrap();

        assert_eq!(by_commit_prefix, vec![commit_oid.clone()]);
        assert!(by_blob_prefix.is_empty() || by_blob_prefix == vec![commit_oid]);
        assert_eq!(store.database.kind_of(&blob_oid), Some(ObjectType::Blob));
    }
}
