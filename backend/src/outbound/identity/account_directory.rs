//! Resolver backed by a static account directory.
//!
//! The directory file is a JSON object mapping usernames to secrets:
//!
//! ```json
//! { "alice": "correct horse", "bob": "battery staple" }
//! ```

use std::collections::HashMap;
use std::{fmt, io};

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{IdentityResolver, IdentityResolverError};
use crate::domain::{Credentials, Identity};

/// Failures while loading an account directory.
#[derive(Debug, thiserror::Error)]
pub enum AccountDirectoryError {
    #[error("failed to read account directory {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("account directory {path} is not a JSON object of strings: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("account directory contains an invalid username {username:?}")]
    InvalidUsername { username: String },
    #[error("account {username} has an empty secret")]
    EmptySecret { username: String },
}

/// Verifies credentials against known username/secret pairs.
#[derive(Default)]
pub struct AccountDirectoryResolver {
    accounts: HashMap<Identity, Zeroizing<String>>,
}

impl fmt::Debug for AccountDirectoryResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountDirectoryResolver")
            .field("accounts", &self.accounts.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AccountDirectoryResolver {
    /// Build a directory from `(username, secret)` pairs.
    ///
    /// Usernames are trimmed; later duplicates replace earlier ones.
    ///
    /// ```
    /// use bazaar_backend::outbound::identity::AccountDirectoryResolver;
    ///
    /// let directory = AccountDirectoryResolver::from_accounts([("alice", "s3cret")])
    ///     .expect("valid accounts");
    /// assert_eq!(directory.len(), 1);
    /// ```
    pub fn from_accounts<I, U, S>(accounts: I) -> Result<Self, AccountDirectoryError>
    where
        I: IntoIterator<Item = (U, S)>,
        U: AsRef<str>,
        S: Into<String>,
    {
        let mut map = HashMap::new();
        for (username, secret) in accounts {
            let username = username.as_ref();
            let identity =
                Identity::new(username).map_err(|_| AccountDirectoryError::InvalidUsername {
                    username: username.to_owned(),
                })?;
            let secret = Zeroizing::new(secret.into());
            if secret.is_empty() {
                return Err(AccountDirectoryError::EmptySecret {
                    username: identity.to_string(),
                });
            }
            map.insert(identity, secret);
        }
        Ok(Self { accounts: map })
    }

    /// Load the directory from a JSON file.
    pub fn load(path: &Utf8Path) -> Result<Self, AccountDirectoryError> {
        let read_error = |source| AccountDirectoryError::Read {
            path: path.to_path_buf(),
            source,
        };
        let file_name = path.file_name().ok_or_else(|| {
            read_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "path does not name a file",
            ))
        })?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
        let raw = Zeroizing::new(dir.read_to_string(file_name).map_err(read_error)?);
        let accounts: HashMap<String, String> =
            serde_json::from_str(&raw).map_err(|source| AccountDirectoryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let directory = Self::from_accounts(accounts)?;
        info!(path = %path, accounts = directory.len(), "account directory loaded");
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl IdentityResolver for AccountDirectoryResolver {
    async fn resolve_identity(
        &self,
        credentials: &Credentials,
    ) -> Result<Identity, IdentityResolverError> {
        let identity = Identity::new(credentials.username())
            .map_err(|err| IdentityResolverError::malformed(err.to_string()))?;
        let Some((known, expected)) = self.accounts.get_key_value(&identity) else {
            warn!(actor = %identity, "unknown account");
            return Err(IdentityResolverError::unknown_account(identity));
        };
        match credentials.secret() {
            Some(secret) if secret == expected.as_str() => Ok(known.clone()),
            _ => {
                warn!(actor = %identity, "secret rejected");
                Err(IdentityResolverError::invalid_credentials(identity))
            }
        }
    }
}
