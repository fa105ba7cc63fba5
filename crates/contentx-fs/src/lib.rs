//! Filesystem layer for contentx
//!
//! Provides atomic writes, advisory locks and format-agnostic loading and
//! saving of structured files (snapshots and settings).

pub mod config;
pub mod error;
pub mod io;

pub use config::{ConfigStore, Format};
pub use error::{Error, Result};
pub use io::FileLock;
