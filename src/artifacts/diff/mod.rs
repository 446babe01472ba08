//! Tree and content comparison
//!
//! - `tree_diff`: which paths were added, deleted or modified between two trees
//! - `line_diff`: what changed inside a modified file
//!
//! The line diff is positional: line `i` of one side is compared with line `i`
//! of the other. Inserting a line near the top of a file therefore reports
//! every following line as changed; no minimal edit script is computed.

pub mod line_diff;
pub mod tree_diff;
