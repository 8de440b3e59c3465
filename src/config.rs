//! Configuration management for the SoundCloud CLI.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)
//!
//! Everything is read once into a [`Config`] and validated up front, so a
//! missing client id or a malformed URL fails at startup rather than halfway
//! through an upload.

use std::{
    env,
    net::SocketAddr,
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use reqwest::Url;

use crate::{
    Res,
    error::{Error, ErrorKind},
    types::{RetryPolicy, Sharing},
};

pub const CLIENT_ID: &str = "SOUNDCLOUD_CLIENT_ID";
pub const CLIENT_SECRET: &str = "SOUNDCLOUD_CLIENT_SECRET";
pub const REDIRECT_URI: &str = "SOUNDCLOUD_REDIRECT_URI";
pub const CONNECT_URL: &str = "SOUNDCLOUD_CONNECT_URL";
pub const API_URL: &str = "SOUNDCLOUD_API_URL";
pub const ARTWORK_PATH: &str = "SOUNDCLOUD_ARTWORK_PATH";
pub const TRACK_TITLE: &str = "SOUNDCLOUD_TRACK_TITLE";
pub const TRACK_SHARING: &str = "SOUNDCLOUD_TRACK_SHARING";
pub const HTTP_TIMEOUT_SECS: &str = "SOUNDCLOUD_HTTP_TIMEOUT_SECS";
pub const LIST_RETRIES: &str = "SOUNDCLOUD_LIST_RETRIES";
pub const SERVER_ADDRESS: &str = "SERVER_ADDRESS";
pub const ACCESS_TOKEN: &str = "SOUNDCLOUD_ACCESS_TOKEN";

pub const DEFAULT_CONNECT_URL: &str = "https://soundcloud.com/connect";
pub const DEFAULT_API_URL: &str = "https://api.soundcloud.com";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LIST_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(2);

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Looks for `scloud/.env` under the platform data directory:
/// - Linux: `~/.local/share/scloud/.env`
/// - macOS: `~/Library/Application Support/scloud/.env`
/// - Windows: `%LOCALAPPDATA%/scloud/.env`
///
/// The directory is created when missing. A missing `.env` file is fine since
/// every value can also come from the process environment; a file that exists
/// but cannot be parsed is an error.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
        log::debug!("loaded environment from {}", path.display());
    }
    Ok(())
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("scloud/.env");
    path
}

/// Returns the access token handed to `upload` and `tracks`, if one is set.
pub fn access_token() -> Option<String> {
    env::var(ACCESS_TOKEN)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Validated application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub connect_url: Url,
    pub api_url: Url,
    pub artwork: Option<PathBuf>,
    pub default_title: Option<String>,
    pub default_sharing: Sharing,
    pub server_addr: SocketAddr,
    pub timeout: Duration,
    pub list_retry: RetryPolicy,
}

impl Config {
    /// Configuration with the public SoundCloud endpoints and default settings.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Res<Self> {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            connect_url: parse_url(CONNECT_URL, DEFAULT_CONNECT_URL)?,
            api_url: parse_url(API_URL, DEFAULT_API_URL)?,
            artwork: None,
            default_title: None,
            default_sharing: Sharing::default(),
            server_addr: parse_value(SERVER_ADDRESS, DEFAULT_SERVER_ADDRESS)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            list_retry: RetryPolicy::new(DEFAULT_LIST_ATTEMPTS, DEFAULT_RETRY_BACKOFF),
        }
        .validated()
    }

    /// Reads and validates the configuration from the process environment.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to
    /// its value. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required =
            |key: &str| get(key).ok_or_else(|| Error::config(format!("{key} must be set")));

        let mut config = Self::new(
            required(CLIENT_ID)?,
            required(CLIENT_SECRET)?,
            required(REDIRECT_URI)?,
        )?;

        if let Some(url) = get(CONNECT_URL) {
            config.connect_url = parse_url(CONNECT_URL, &url)?;
        }
        if let Some(url) = get(API_URL) {
            config.api_url = parse_url(API_URL, &url)?;
        }
        config.artwork = get(ARTWORK_PATH).map(PathBuf::from);
        config.default_title = get(TRACK_TITLE);
        if let Some(sharing) = get(TRACK_SHARING) {
            config.default_sharing = sharing
                .parse()
                .map_err(|e: String| Error::config(format!("{TRACK_SHARING}: {e}")))?;
        }
        if let Some(addr) = get(SERVER_ADDRESS) {
            config.server_addr = parse_value(SERVER_ADDRESS, &addr)?;
        }
        if let Some(secs) = get(HTTP_TIMEOUT_SECS) {
            let secs: u64 = parse_value(HTTP_TIMEOUT_SECS, &secs)?;
            if secs == 0 {
                return Err(Error::config(format!(
                    "{HTTP_TIMEOUT_SECS} must be greater than zero"
                )));
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = get(LIST_RETRIES) {
            let attempts: u32 = parse_value(LIST_RETRIES, &attempts)?;
            config.list_retry = RetryPolicy::new(attempts, config.list_retry.backoff);
        }

        config.validated()
    }

    /// URL of the token endpoint, derived from the API base.
    pub fn token_url(&self) -> String {
        self.endpoint("oauth2/token")
    }

    /// Joins `path` onto the API base without doubling slashes.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn validated(self) -> Res<Self> {
        if self.client_id.trim().is_empty() {
            return Err(Error::config(format!("{CLIENT_ID} must not be empty")));
        }
        if self.client_secret.trim().is_empty() {
            return Err(Error::config(format!("{CLIENT_SECRET} must not be empty")));
        }
        parse_url(REDIRECT_URI, &self.redirect_uri)?;
        Ok(self)
    }
}

fn parse_url(key: &str, value: &str) -> Res<Url> {
    let url = Url::parse(value).map_err(|e| {
        Error::with_source(
            ErrorKind::Config,
            format!("{key} is not a valid URL: {value}"),
            e,
        )
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::config(format!(
            "{key} must use http:// or https://, got {scheme}://"
        ))),
    }
}

fn parse_value<T>(key: &str, value: &str) -> Res<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| Error::config(format!("{key}: invalid value '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const BASE: [(&str, &str); 3] = [
        (CLIENT_ID, "id"),
        (CLIENT_SECRET, "secret"),
        (REDIRECT_URI, "http://127.0.0.1:8080/callback"),
    ];

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&BASE)).unwrap();
        assert_eq!(config.client_id, "id");
        assert_eq!(config.connect_url.as_str(), "https://soundcloud.com/connect");
        assert_eq!(config.token_url(), "https://api.soundcloud.com/oauth2/token");
        assert_eq!(config.artwork, None);
        assert_eq!(config.default_sharing, Sharing::Public);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.list_retry.max_attempts, 3);
        assert_eq!(config.server_addr.port(), 8080);
    }

    #[test]
    fn missing_client_id_is_rejected() {
        let err = Config::from_lookup(lookup(&BASE[1..])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.message().contains(CLIENT_ID));
    }

    #[test]
    fn blank_secret_counts_as_missing() {
        let mut pairs = BASE.to_vec();
        pairs[1] = (CLIENT_SECRET, "   ");
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.message().contains(CLIENT_SECRET));
    }

    #[test]
    fn invalid_redirect_uri_is_rejected() {
        let mut pairs = BASE.to_vec();
        pairs[2] = (REDIRECT_URI, "not a url");
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn overrides_are_read() {
        let mut pairs = BASE.to_vec();
        pairs.extend([
            (API_URL, "http://localhost:9000/"),
            (ARTWORK_PATH, "art/cover.jpg"),
            (TRACK_TITLE, "Demo"),
            (TRACK_SHARING, "PRIVATE"),
            (HTTP_TIMEOUT_SECS, "5"),
            (LIST_RETRIES, "0"),
            (SERVER_ADDRESS, "0.0.0.0:3000"),
        ]);
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.endpoint("/me/tracks.json"), "http://localhost:9000/me/tracks.json");
        assert_eq!(config.artwork, Some(PathBuf::from("art/cover.jpg")));
        assert_eq!(config.default_title.as_deref(), Some("Demo"));
        assert_eq!(config.default_sharing, Sharing::Private);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.list_retry.max_attempts, 1);
        assert_eq!(config.server_addr.port(), 3000);
    }

    #[test]
    fn bad_numbers_and_schemes_are_rejected() {
        for (key, value) in [
            (HTTP_TIMEOUT_SECS, "soon"),
            (HTTP_TIMEOUT_SECS, "0"),
            (LIST_RETRIES, "-1"),
            (CONNECT_URL, "ftp://soundcloud.com/connect"),
            (TRACK_SHARING, "friends"),
            (SERVER_ADDRESS, "localhost"),
        ] {
            let mut pairs = BASE.to_vec();
            pairs.push((key, value));
            let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Config, "{key}={value}");
        }
    }
}
