//! Commit history traversal
//!
//! The graph never reads storage itself; callers hand it a parent loader,
//! so the same traversal runs against the object store or an in-memory map.

pub mod graph;

pub use graph::{Ancestry, HistoryGraph};
