//! Harvest Core Library
//!
//! Resumable mirroring of a remote music catalog: the fetch-state store, its
//! migrations, the catalog boundary and the artist → album → song traversal.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod model;
