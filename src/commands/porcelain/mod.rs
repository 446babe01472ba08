//! User-facing operations
//!
//! Each command is an `impl Repository` block returning a value for the
//! binary to format. Nothing here prints.

pub mod add;
pub mod branch;
pub mod clone;
pub mod commit;
pub mod diff;
pub mod init;
pub mod log;
pub mod merge;
pub mod rebase;
pub mod remove;
pub mod stash;
pub mod tag;
