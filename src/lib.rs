//! twig: a small content-addressed version-control engine
//!
//! A repository lives in a `.twig/` directory next to the files it tracks.
//! Blobs, trees and commits are stored once per SHA-1 hash; branches and
//! tags are plain files holding a commit hash.
//!
//! ```no_run
//! use twig::{Config, Repository};
//!
//! # fn main() -> twig::Result<()> {
//! let repository = Repository::init("my-project", Config::from_env()?)?;
//! repository.add(&["notes.txt"])?;
//! let oid = repository.commit("first notes")?;
//! println!("{}", oid.to_short_oid());
//! # Ok(())
//! # }
//! ```

pub mod areas;
pub mod artifacts;
pub mod commands;

pub use areas::repository::Repository;
pub use artifacts::core::config::Config;
pub use artifacts::core::error::{Error, Result};
