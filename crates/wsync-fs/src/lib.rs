//! Filesystem primitives for wsync
//!
//! Provides atomic I/O, format-agnostic config loading, staleness digests and
//! the persisted error marker that blocks runs after an unrecovered failure.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod marker;

pub use config::ConfigStore;
pub use constants::WorkspacePath;
pub use error::{Error, Result};
pub use marker::ErrorMarker;
