//! Three-way merge classification
//!
//! Compares the trees of two branch tips against their common ancestor and
//! decides, per path, which side wins or whether the path conflicts.

pub mod three_way;
