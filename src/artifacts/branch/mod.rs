//! Ref names and revision parsing
//!
//! - `branch_name`: validated branch and tag names
//! - `revision`: resolution of user-supplied revisions to commit ids

pub mod branch_name;
pub mod revision;

use regex::Regex;
use std::sync::LazyLock;

/// Names matching this pattern are rejected for branches and tags
pub const INVALID_REF_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
pub const PARENT_REGEX: &str = r"^(.+)\^$";
pub const ANCESTOR_REGEX: &str = r"^(.+)\~(\d+)$";

pub(crate) static INVALID_REF_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(INVALID_REF_NAME_REGEX).expect("ref name pattern compiles"));
pub(crate) static PARENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PARENT_REGEX).expect("parent pattern compiles"));
pub(crate) static ANCESTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ANCESTOR_REGEX).expect("ancestor pattern compiles"));

/// Kind of named pointer stored in the refs area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    Branch,
    Tag,
}

impl RefKind {
    /// Directory under `refs/` holding refs of this kind
    pub fn directory(&self) -> &'static str {
        match self {
            RefKind::Branch => "heads",
            RefKind::Tag => "tags",
        }
    }
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefKind::Branch => write!(f, "branch"),
            RefKind::Tag => write!(f, "tag"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_patterns_split_suffixes() {
        assert!(INVALID_REF_NAME.is_match("feature..x"));
        assert_eq!(&PARENT.captures("main^").unwrap()[1], "main");

        let caps = ANCESTOR.captures("main~3").unwrap();
        assert_eq!((&caps[1], &caps[2]), ("main", "3"));
    }
}
