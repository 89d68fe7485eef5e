//! Shared library modules for the vigil transfer watcher.
//!
//! The binary wires these together; they are exported so integration
//! tests and alternative frontends can reuse the core.

pub mod assets;
pub mod classify;
pub mod config;
pub mod dedup;
pub mod etherscan;
pub mod notify;
pub mod scheduler;
pub mod watchlist;
