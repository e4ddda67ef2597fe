//! Resolver that takes usernames at face value.

use async_trait::async_trait;

use crate::domain::ports::{IdentityResolver, IdentityResolverError};
use crate::domain::{Credentials, Identity};

/// Accepts any non-blank username and ignores secrets.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrustedUsernameResolver;

#[async_trait]
impl IdentityResolver for TrustedUsernameResolver {
    async fn resolve_identity(
        &self,
        credentials: &Credentials,
    ) -> Result<Identity, IdentityResolverError> {
        Identity::new(credentials.username())
            .map_err(|err| IdentityResolverError::malformed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("carol", None)]
    #[case("  dave ", Some("ignored"))]
    #[tokio::test]
    async fn any_username_is_accepted(#[case] username: &str, #[case] secret: Option<&str>) {
        let credentials = Credentials::try_from_parts(username, secret).expect("credentials");
        let identity = TrustedUsernameResolver
            .resolve_identity(&credentials)
            .await
            .expect("trusted");
        assert_eq!(identity.as_ref(), username.trim());
    }
}
