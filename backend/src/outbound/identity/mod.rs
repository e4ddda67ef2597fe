//! Identity resolver adapters.
//!
//! [`TrustedUsernameResolver`] accepts any well-formed username, matching
//! deployments where callers are trusted to name themselves.
//! [`AccountDirectoryResolver`] checks secrets against a configured account
//! directory.

mod account_directory;
mod trusted;

pub use account_directory::{AccountDirectoryError, AccountDirectoryResolver};
pub use trusted::TrustedUsernameResolver;
