//! Object types and their canonical serialization
//!
//! Every stored object is identified by the SHA-1 hash of its canonical form:
//!
//! - **Blob**: raw file content
//! - **Tree**: mapping from repository-relative path to blob id
//! - **Commit**: tree id, optional parent id, author and message
//!
//! The canonical form is `<kind> <byte-length>\0<payload>`. Payload encodings
//! are fixed per kind and independent of insertion order, so equal values
//! always hash equally.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Shortest abbreviated hash accepted when resolving revisions
pub const MIN_ABBREV_LENGTH: usize = 4;
