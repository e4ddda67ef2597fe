//! Builders for the listing store, identity resolver and HTTP state.

use std::io;
use std::sync::Arc;

use bazaar_backend::domain::ports::{IdentityResolver, ListingRepository};
use bazaar_backend::domain::{CatalogService, CountryCode};
use bazaar_backend::inbound::http::state::HttpState;
use bazaar_backend::outbound::identity::{AccountDirectoryResolver, TrustedUsernameResolver};
use bazaar_backend::outbound::listing_store::{InMemoryListingStore, JsonListingStore};
use bazaar_backend::settings::ServerSettings;
use mockable::DefaultClock;
use tracing::{info, warn};

fn catalog_state<R>(
    repository: R,
    default_country_code: CountryCode,
    identity: Arc<dyn IdentityResolver>,
) -> HttpState
where
    R: ListingRepository + 'static,
{
    let catalog = Arc::new(CatalogService::new(
        Arc::new(repository),
        Arc::new(DefaultClock),
        default_country_code,
    ));
    HttpState::new(catalog.clone(), catalog, identity)
}

/// Choose the identity resolver: the account directory when one is
/// configured, otherwise trusted usernames.
pub(crate) fn build_identity_resolver(
    settings: &ServerSettings,
) -> io::Result<Arc<dyn IdentityResolver>> {
    match settings.accounts_path() {
        Some(path) => {
            let directory = AccountDirectoryResolver::load(&path)
                .map_err(|err| io::Error::other(err.to_string()))?;
            info!(%path, accounts = directory.len(), "loaded account directory");
            Ok(Arc::new(directory))
        }
        None => {
            warn!("no account directory configured; trusting claimed usernames");
            Ok(Arc::new(TrustedUsernameResolver))
        }
    }
}

/// Open the listing store described by `settings` and wrap it in HTTP state.
///
/// # Errors
/// Returns [`io::Error`] when a setting is unusable, the account directory
/// cannot be read or the listing document cannot be opened.
pub(crate) fn build_http_state(settings: &ServerSettings) -> io::Result<HttpState> {
    let default_country_code = settings
        .default_country_code()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    let identity = build_identity_resolver(settings)?;

    if settings.in_memory {
        warn!("listing persistence disabled; data is lost on restart");
        return Ok(catalog_state(
            InMemoryListingStore::new(),
            default_country_code,
            identity,
        ));
    }

    let path = settings.data_path();
    let store = JsonListingStore::open(&path).map_err(|err| io::Error::other(err.to_string()))?;
    Ok(catalog_state(store, default_country_code, identity))
}

#[cfg(test)]
mod tests {
    //! Unit tests for state construction.

    use super::*;
    use bazaar_backend::domain::ListingCriteria;
    use bazaar_backend::test_support::cap_fs::write_file;
    use bazaar_backend::test_support::store::TempStorePath;

    fn settings() -> ServerSettings {
        ServerSettings {
            bind_addr: None,
            data_path: None,
            in_memory: true,
            accounts_path: None,
            default_country_code: None,
            session_key_file: None,
            allow_ephemeral_session_key: false,
            cookie_secure: Some(false),
        }
    }

    #[tokio::test]
    async fn in_memory_state_starts_empty() {
        let state = build_http_state(&settings()).expect("state");
        let page = state
            .listings_query
            .list_listings(ListingCriteria::default())
            .await
            .expect("list");
        assert_eq!(page.total_count(), 0);
    }

    #[tokio::test]
    async fn json_store_is_created_under_missing_directories() {
        let temp = TempStorePath::new().expect("temp dir");
        let path = temp.path().with_file_name("nested").join("listings.json");
        let state = build_http_state(&ServerSettings {
            in_memory: false,
            data_path: Some(path.to_string()),
            ..settings()
        })
        .expect("state");

        let page = state
            .listings_query
            .list_listings(ListingCriteria::default())
            .await
            .expect("list");
        assert_eq!(page.total_count(), 0);
    }

    #[test]
    fn corrupt_listing_document_fails_startup() {
        let temp = TempStorePath::new().expect("temp dir");
        write_file(temp.path(), b"not json").expect("seed");

        let result = build_http_state(&ServerSettings {
            in_memory: false,
            data_path: Some(temp.path().to_string()),
            ..settings()
        });
        assert!(result.is_err());
    }

    #[test]
    fn missing_account_directory_fails_startup() {
        let temp = TempStorePath::new().expect("temp dir");
        let result = build_identity_resolver(&ServerSettings {
            accounts_path: Some(temp.path().with_file_name("accounts.json").to_string()),
            ..settings()
        });
        assert!(result.is_err());
    }

    #[test]
    fn invalid_country_code_fails_startup() {
        let result = build_http_state(&ServerSettings {
            default_country_code: Some("abc".to_owned()),
            ..settings()
        });
        assert!(result.is_err());
    }
}
