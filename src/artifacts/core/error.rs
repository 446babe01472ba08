//! Error taxonomy shared by every store, ref and history operation
//!
//! Operations never print and continue; they surface one of these kinds to
//! the caller. `MergeConflict` is an expected outcome rather than a crash and
//! always carries the complete, sorted list of conflicting paths.

use crate::artifacts::branch::RefKind;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a twig repository: {}", .0.display())]
    NotInitialized(PathBuf),

    #[error("{kind} object {oid} not found")]
    NotFound { kind: ObjectType, oid: ObjectId },

    #[error("object {oid} is a {actual}, not a {expected}")]
    KindMismatch {
        oid: ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    },

    #[error("branch {0} not found")]
    UnknownBranch(String),

    #[error("tag {0} not found")]
    UnknownTag(String),

    #[error("revision {0} could not be resolved")]
    UnknownRevision(String),

    #[error("revision {revision} is ambiguous ({} candidates)", candidates.len())]
    AmbiguousRevision {
        revision: String,
        candidates: Vec<ObjectId>,
    },

    #[error("{kind} {name} already exists")]
    AlreadyExists { kind: RefKind, name: String },

    #[error("cannot delete branch {0}: it is the active branch")]
    IsActiveBranch(String),

    #[error("branch {0} has no commits")]
    EmptyBranch(String),

    #[error("no common ancestor between {left} and {right}")]
    NoCommonAncestor { left: String, right: String },

    #[error("merge conflict in {} path(s): {}", paths.len(), paths.join(", "))]
    MergeConflict { paths: Vec<String> },

    #[error("nothing to commit")]
    NothingToCommit,

    #[error("no stash entries")]
    EmptyStash,

    #[error("invalid {kind} name: {name}")]
    InvalidRefName { kind: RefKind, name: String },

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("corrupt {what}: {reason}")]
    Corrupt { what: String, reason: String },

    #[error("destination already contains a repository: {}", .0.display())]
    RepositoryExists(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn corrupt(what: impl Into<String>, reason: impl ToString) -> Self {
        Error::Corrupt {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::io("I/O operation failed", source)
    }
}

/// Attach a human-readable context to an I/O failure
///
/// Mirrors `anyhow::Context` for the typed error: the closure is only run on
/// the error path.
pub trait IoContext<T> {
    fn io_context<F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn io_context<F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|source| Error::io(context(), source))
    }
}
