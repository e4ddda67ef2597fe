//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `BAZAAR_*` environment variables and an
//! optional configuration file, in increasing order of precedence.

use std::net::SocketAddr;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::domain::{ContactValidationError, CountryCode};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATA_PATH: &str = "data/listings.json";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Accept the country code as text or as the integer the environment
/// provider produces for values like `44` and `+44`.
fn deserialize_country_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCode {
        Text(String),
        Number(i64),
    }

    let raw: Option<RawCode> = Option::deserialize(deserializer)?;
    Ok(raw.map(|code| match code {
        RawCode::Text(text) => text,
        RawCode::Number(number) => number.to_string(),
    }))
}

/// Errors raised when a setting has an unusable value.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid default country code: {0}")]
    InvalidCountryCode(#[from] ContactValidationError),
}

/// Configuration values for the listing server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BAZAAR")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Location of the persisted listing document.
    pub data_path: Option<String>,
    /// Keep listings in memory only.
    #[ortho_config(default = false)]
    pub in_memory: bool,
    /// JSON file mapping usernames to secrets. Bare usernames are trusted
    /// when absent.
    pub accounts_path: Option<String>,
    /// Country code applied to phone numbers written without one.
    #[serde(default, deserialize_with = "deserialize_country_code")]
    pub default_country_code: Option<String>,
    /// File holding the session cookie signing key.
    pub session_key_file: Option<String>,
    /// Fall back to a generated session key when the key file is missing.
    #[ortho_config(default = false)]
    pub allow_ephemeral_session_key: bool,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: Option<bool>,
}

impl ServerSettings {
    /// Parsed listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    /// Listing document path, defaulting to `data/listings.json`.
    pub fn data_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.data_path.as_deref().unwrap_or(DEFAULT_DATA_PATH))
    }

    pub fn accounts_path(&self) -> Option<Utf8PathBuf> {
        self.accounts_path.as_deref().map(Utf8PathBuf::from)
    }

    /// Validated default country code, `90` unless configured.
    pub fn default_country_code(&self) -> Result<CountryCode, SettingsError> {
        match self.default_country_code.as_deref() {
            Some(raw) => Ok(CountryCode::new(raw)?),
            None => Ok(CountryCode::default()),
        }
    }

    /// Whether the session cookie is marked `Secure`, `true` unless disabled.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn session_key_file(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(
            self.session_key_file
                .as_deref()
                .unwrap_or(DEFAULT_SESSION_KEY_FILE),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and fallbacks.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "BAZAAR_BIND_ADDR",
        "BAZAAR_DATA_PATH",
        "BAZAAR_IN_MEMORY",
        "BAZAAR_ACCOUNTS_PATH",
        "BAZAAR_DEFAULT_COUNTRY_CODE",
        "BAZAAR_SESSION_KEY_FILE",
        "BAZAAR_ALLOW_EPHEMERAL_SESSION_KEY",
        "BAZAAR_COOKIE_SECURE",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("bazaar")]).expect("config should load")
    }

    /// Every `BAZAAR_*` variable cleared except the given overrides.
    fn env_with(overrides: &[(&str, &str)]) -> [(&'static str, Option<String>); 8] {
        VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        })
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.data_path(), Utf8PathBuf::from("data/listings.json"));
        assert!(!settings.in_memory);
        assert!(settings.accounts_path().is_none());
        assert_eq!(
            settings.default_country_code().expect("country code").as_ref(),
            "90"
        );
        assert_eq!(
            settings.session_key_file(),
            Utf8PathBuf::from("/var/run/secrets/session_key")
        );
        assert!(settings.cookie_secure());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("BAZAAR_BIND_ADDR", "127.0.0.1:9000"),
            ("BAZAAR_DATA_PATH", "/tmp/bazaar/listings.json"),
            ("BAZAAR_IN_MEMORY", "true"),
            ("BAZAAR_ACCOUNTS_PATH", "/etc/bazaar/accounts.json"),
            ("BAZAAR_DEFAULT_COUNTRY_CODE", "+44"),
            ("BAZAAR_COOKIE_SECURE", "false"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(
            settings.data_path(),
            Utf8PathBuf::from("/tmp/bazaar/listings.json")
        );
        assert!(settings.in_memory);
        assert_eq!(
            settings.accounts_path(),
            Some(Utf8PathBuf::from("/etc/bazaar/accounts.json"))
        );
        assert_eq!(
            settings.default_country_code().expect("country code").as_ref(),
            "44"
        );
        assert!(!settings.cookie_secure());
    }

    #[rstest]
    #[case("44")]
    #[case("+44")]
    #[case("1")]
    fn numeric_country_codes_load(#[case] value: &str) {
        let _guard = lock_env(env_with(&[("BAZAAR_DEFAULT_COUNTRY_CODE", value)]));

        let settings = load_from_empty_args();
        let expected = value.trim_start_matches('+');
        assert_eq!(
            settings.default_country_code().expect("country code").as_ref(),
            expected
        );
    }

    #[rstest]
    #[case("BAZAAR_BIND_ADDR", "not-an-address")]
    #[case("BAZAAR_DEFAULT_COUNTRY_CODE", "abc")]
    #[case("BAZAAR_DEFAULT_COUNTRY_CODE", "1234")]
    fn unusable_values_are_reported(#[case] name: &str, #[case] value: &str) {
        let _guard = lock_env(env_with(&[(name, value)]));

        let settings = load_from_empty_args();
        let failed = settings.bind_addr().is_err() || settings.default_country_code().is_err();
        assert!(failed, "{name}={value} should be rejected");
    }
}
