//! Repository operations
//!
//! - `plumbing`: object-level access (hash-object, cat-file)
//! - `porcelain`: version control workflows (commit, branch, merge, rebase, ...)

pub mod plumbing;
pub mod porcelain;
