//! Direct access to the object store
//!
//! - `hash-object`: hash a file as a blob, optionally storing it
//! - `cat-file`: load and display a stored object

pub mod cat_file;
pub mod hash_object;
