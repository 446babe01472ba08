//! Tree object
//!
//! A tree is a flat snapshot: repository-relative path to blob id.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<path>\0<20-byte-sha1>`, entries sorted by path.
//!
//! Entries are kept in a `BTreeMap`, so the serialized form (and therefore
//! the hash) does not depend on the order paths were inserted in.

use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<String, ObjectId>,
}

impl Tree {
    /// Build a tree from `(path, blob id)` pairs; later duplicates win
    pub fn from_entries<P: Into<String>>(
        entries: impl IntoIterator<Item = (P, ObjectId)>,
    ) -> Result<Self> {
        let mut tree = Self::default();
        for (path, oid) in entries {
            tree.insert(path, oid)?;
        }

        Ok(tree)
    }

    pub fn insert(&mut self, path: impl Into<String>, oid: ObjectId) -> Result<Option<ObjectId>> {
        let path = path.into();
        validate_path(&path)?;

        Ok(self.entries.insert(path, oid))
    }

    pub fn remove(&mut self, path: &str) -> Option<ObjectId> {
        self.entries.remove(path)
    }

    pub fn get(&self, path: &str) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.entries.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Paths are repository-relative, `/`-separated and free of NUL and line breaks
pub fn validate_path(path: &str) -> Result<()> {
    let valid = !path.is_empty()
        && !path.contains(['\0', '\n', '\r'])
        && !path.starts_with('/')
        && !path.ends_with('/')
        && path
            .split('/')
            .all(|component| !component.is_empty() && component != "." && component != "..");

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidPath(path.to_string()))
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        let mut content_bytes = Vec::new();

        for (path, oid) in &self.entries {
            content_bytes.write_all(path.as_bytes())?;
            content_bytes.push(0);
            oid.write_h40_to(&mut content_bytes)?;
        }

        frame(self.object_type(), &content_bytes)
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut entries = BTreeMap::new();
        let mut path_bytes = Vec::new();

        loop {
            path_bytes.clear();
            let n = reader.read_until(b'\0', &mut path_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if path_bytes.pop() != Some(b'\0') {
                return Err(Error::corrupt("tree", "unexpected EOF in path"));
            }

            let path = String::from_utf8(path_bytes.clone())
                .map_err(|e| Error::corrupt("tree", e))?;
            validate_path(&path).map_err(|e| Error::corrupt("tree", e))?;

            let oid = ObjectId::read_h40_from(&mut reader)
                .map_err(|_| Error::corrupt("tree", "unexpected EOF in object id"))?;

            if entries.insert(path, oid).is_some() {
                return Err(Error::corrupt("tree", "duplicate path"));
            }
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|(path, oid)| format!("{} {}\t{}", ObjectType::Blob, oid, path))
            .collect::<Vec<String>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::io::Cursor;

    fn blob_id(content: &str) -> ObjectId {
        Blob::new(content.to_string()).object_id().unwrap()
    }

    fn payload(bytes: &Bytes) -> Bytes {
        let start = bytes.iter().position(|b| *b == 0).unwrap() + 1;
        bytes.slice(start..)
    }

    #[test]
    fn insertion_order_does_not_change_hash() {
        let forward = Tree::from_entries([
            ("a.txt", blob_id("1")),
            ("dir/b.txt", blob_id("2")),
            ("z.txt", blob_id("3")),
        ])
        .unwrap();
        let backward = Tree::from_entries([
            ("z.txt", blob_id("3")),
            ("dir/b.txt", blob_id("2")),
            ("a.txt", blob_id("1")),
        ])
        .unwrap();

        assert_eq!(forward.serialize().unwrap(), backward.serialize().unwrap());
        assert_eq!(forward.object_id().unwrap(), backward.object_id().unwrap());
    }

    #[test]
    fn parse_inverts_serialize() {
        let tree = Tree::from_entries([
            ("README.md", blob_id("readme")),
            ("src/main.rs", blob_id("fn main() {}")),
        ])
        .unwrap();

        let parsed = Tree::deserialize(Cursor::new(payload(&tree.serialize().unwrap()))).unwrap();

        assert_eq!(parsed, tree);
    }

    #[test]
    fn empty_tree_round_trips() {
        let tree = Tree::default();

        assert_eq!(tree.serialize().unwrap().as_ref(), b"tree 0\0");
        assert_eq!(Tree::deserialize(Cursor::new(Vec::new())).unwrap(), tree);
    }

    #[test]
    fn truncated_entry_is_corrupt() {
        let result = Tree::deserialize(Cursor::new(b"a.txt\0\x01\x02".to_vec()));

        assert!(matches!(result, Err(Error::Corrupt { .. })));
    }

    #[rstest]
    #[case("")]
    #[case("/abs")]
    #[case("dir/")]
    #[case("a//b")]
    #[case("../escape")]
    #[case("a/./b")]
    #[case("nul\0byte")]
    #[case("line\nbreak")]
    #[case("carriage\r")]
    fn rejects_invalid_paths(#[case] path: &str) {
        let mut tree = Tree::default();

        assert!(matches!(
            tree.insert(path, blob_id("x")),
            Err(Error::InvalidPath(_))
        ));
    }

    proptest! {
        #[test]
        fn any_permutation_yields_same_hash(
            entries in prop::collection::btree_map("[a-z]{1,8}(/[a-z]{1,8}){0,2}", "[a-z]{0,12}", 1..12),
            seed in any::<u64>(),
        ) {
            let ordered = entries
                .iter()
                .map(|(path, content)| (path.clone(), blob_id(content)))
                .collect::<Vec<_>>();

            let mut shuffled = ordered.clone();
            // deterministic rotation + reversal driven by the seed
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            if seed % 2 == 0 {
                shuffled.reverse();
            }

            let first = Tree::from_entries(ordered).unwrap();
            let second = Tree::from_entries(shuffled).unwrap();

            prop_assert_eq!(first.serialize().unwrap(), second.serialize().unwrap());
            prop_assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
        }
    }
}
