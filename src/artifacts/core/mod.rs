//! Core utilities and shared types
//!
//! This module contains the pieces every storage area depends on:
//!
//! - `error`: the crate-wide error taxonomy and `Result` alias
//! - `config`: repository configuration (cache sizing, author identity, default branch)
//! - `cache`: a bounded, thread-safe LRU cache for parsed objects
//! - `atomic_file`: write-to-temporary-then-rename file replacement

pub mod atomic_file;
pub mod cache;
pub mod config;
pub mod error;
