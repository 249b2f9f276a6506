//! Version control driver for wsync
//!
//! The sync engine talks to the repository exclusively through the
//! [`VersionControl`] trait. [`GitCli`] implements it on top of the `git`
//! command line (for operations whose text output matters, like status and
//! rebase) and `git2` (for reading refs and configuration).

pub mod cli;
pub mod error;
pub mod helpers;
pub mod provider;
pub mod version;

pub use cli::GitCli;
pub use error::{Error, Result};
pub use provider::{CredentialHelper, FULL_FETCH_REFSPEC, RemoteStatus, VersionControl};
