//! Data types and algorithms that do not touch the filesystem
//!
//! - `branch`: validated branch and tag names, revision parsing
//! - `core`: errors, configuration, object cache, atomic file writes
//! - `diff`: tree and line diffs
//! - `history`: ancestor traversal over single-parent commits
//! - `merge`: three-way path classification
//! - `objects`: blob, tree and commit types and their serialization

pub mod branch;
pub mod core;
pub mod diff;
pub mod history;
pub mod merge;
pub mod objects;
