//! Driven port that turns caller credentials into an [`Identity`].
//!
//! Inbound adapters consult a resolver before every owner-stamping or
//! ownership-gated mutation, then hand the resolved identity to the catalog.

use async_trait::async_trait;

use crate::domain::{Credentials, Identity};

use super::define_port_error;

define_port_error! {
    /// Errors raised while resolving an identity.
    pub enum IdentityResolverError {
        /// The secret did not match the account.
        InvalidCredentials { username: String } =>
            "invalid credentials for {username}",
        /// No account exists for the username.
        UnknownAccount { username: String } => "unknown account: {username}",
        /// The credentials could not be interpreted.
        Malformed { message: String } => "malformed credentials: {message}",
    }
}

/// Maps credentials to an authenticated identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve `credentials` or explain why they were rejected.
    async fn resolve_identity(
        &self,
        credentials: &Credentials,
    ) -> Result<Identity, IdentityResolverError>;
}

/// Test resolver that recognises `alice` and `bob` and ignores secrets.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityResolver;

/// Usernames accepted by [`FixtureIdentityResolver`].
pub const FIXTURE_USERNAMES: [&str; 2] = ["alice", "bob"];

#[async_trait]
impl IdentityResolver for FixtureIdentityResolver {
    async fn resolve_identity(
        &self,
        credentials: &Credentials,
    ) -> Result<Identity, IdentityResolverError> {
        let username = credentials.username();
        if !FIXTURE_USERNAMES.contains(&username) {
            return Err(IdentityResolverError::unknown_account(username));
        }
        Identity::new(username).map_err(|err| IdentityResolverError::malformed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("alice", true)]
    #[case("bob", true)]
    #[case("mallory", false)]
    #[tokio::test]
    async fn fixture_resolver_accepts_known_users(#[case] username: &str, #[case] ok: bool) {
        let creds = Credentials::username_only(username).expect("credentials");
        let result = FixtureIdentityResolver.resolve_identity(&creds).await;
        match (ok, result) {
            (true, Ok(identity)) => assert_eq!(identity.as_ref(), username),
            (false, Err(err)) => {
                assert_eq!(err, IdentityResolverError::unknown_account(username));
            }
            (_, other) => panic!("unexpected resolution for {username}: {other:?}"),
        }
    }
}
