//! Stateful storage areas of a repository
//!
//! - `database`: object store for blobs, trees and commits
//! - `index`: staged-file mapping consumed by the next commit
//! - `refs`: branches, tags and HEAD
//! - `repository`: the aggregate handed to every command
//! - `stash`: saved staged-file mappings
//! - `workspace`: working directory file access

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod stash;
pub mod workspace;
