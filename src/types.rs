use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use chrono::Utc;
use serde::{Deserialize, Deserializer};
use tabled::Tabled;

/// Seconds before the real expiry at which a token is already treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    pub scope: String,
    pub refresh_token: Option<String>,
    /// `None` for tokens granted with the `non-expiring` scope.
    pub expires_in: Option<u64>,
    pub obtained_at: u64,
}

impl Token {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            scope: String::new(),
            refresh_token: None,
            expires_in: None,
            obtained_at: Utc::now().timestamp().max(0) as u64,
        }
    }

    pub fn is_expired(&self) -> bool {
        let Some(expires_in) = self.expires_in else {
            return false;
        };
        let now = Utc::now().timestamp().max(0) as u64;
        now.saturating_add(EXPIRY_MARGIN_SECS) >= self.obtained_at.saturating_add(expires_in)
    }
}

/// Body of a successful `/oauth2/token` answer.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scope: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

impl From<TokenResponse> for Token {
    fn from(res: TokenResponse) -> Self {
        Token {
            access_token: res.access_token,
            scope: res.scope,
            refresh_token: res.refresh_token,
            expires_in: res.expires_in,
            obtained_at: Utc::now().timestamp().max(0) as u64,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Track {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permalink_url: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub title: String,
    pub genre: String,
    pub permalink: String,
}

impl From<Track> for TrackTableRow {
    fn from(track: Track) -> Self {
        TrackTableRow {
            title: track.title,
            genre: track.genre,
            permalink: track.permalink_url,
        }
    }
}

/// Answer of the track-creation endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UploadedTrack {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permalink_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sharing: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
}

/// Track visibility on SoundCloud.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sharing {
    #[default]
    Public,
    Private,
}

impl Sharing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sharing::Public => "public",
            Sharing::Private => "private",
        }
    }
}

impl fmt::Display for Sharing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sharing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Sharing::Public),
            "private" => Ok(Sharing::Private),
            other => Err(format!(
                "invalid sharing '{other}', expected 'public' or 'private'"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub path: PathBuf,
    pub title: String,
    pub sharing: Sharing,
    pub artwork: Option<PathBuf>,
}

impl UploadRequest {
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            sharing: Sharing::default(),
            artwork: None,
        }
    }

    pub fn sharing(mut self, sharing: Sharing) -> Self {
        self.sharing = sharing;
        self
    }

    pub fn artwork(mut self, artwork: Option<PathBuf>) -> Self {
        self.artwork = artwork;
        self
    }
}

/// Bounded retry for idempotent calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Never below 1.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_tolerates_missing_and_null_fields() {
        let track: Track = serde_json::from_str(
            r#"{"title":"A","description":null,"permalink_url":"http://x","id":7}"#,
        )
        .unwrap();
        assert_eq!(track.title, "A");
        assert_eq!(track.description, "");
        assert_eq!(track.genre, "");
        assert_eq!(track.permalink_url, "http://x");
    }

    #[test]
    fn uploaded_track_requires_id() {
        assert!(serde_json::from_str::<UploadedTrack>(r#"{"title":"x"}"#).is_err());

        let uploaded: UploadedTrack = serde_json::from_str(r#"{"id":123}"#).unwrap();
        assert_eq!(uploaded.id, 123);
        assert_eq!(uploaded.title, "");
    }

    #[test]
    fn non_expiring_token_never_expires() {
        let token = Token {
            obtained_at: 0,
            ..Token::new("abc")
        };
        assert!(!token.is_expired());
    }

    #[test]
    fn token_expiry_uses_margin() {
        let now = Utc::now().timestamp() as u64;

        let fresh = Token {
            expires_in: Some(3600),
            obtained_at: now,
            ..Token::new("abc")
        };
        assert!(!fresh.is_expired());

        let almost = Token {
            expires_in: Some(30),
            obtained_at: now,
            ..Token::new("abc")
        };
        assert!(almost.is_expired());
    }

    #[test]
    fn token_response_without_expiry() {
        let res: TokenResponse =
            serde_json::from_str(r#"{"access_token":"t","scope":"non-expiring"}"#).unwrap();
        let token = Token::from(res);
        assert_eq!(token.access_token, "t");
        assert_eq!(token.scope, "non-expiring");
        assert_eq!(token.expires_in, None);
    }

    #[test]
    fn sharing_parses_case_insensitively() {
        assert_eq!("Private".parse::<Sharing>(), Ok(Sharing::Private));
        assert_eq!(" public ".parse::<Sharing>(), Ok(Sharing::Public));
        assert!("friends".parse::<Sharing>().is_err());
        assert_eq!(Sharing::default().to_string(), "public");
    }

    #[test]
    fn retry_policy_has_at_least_one_attempt() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
        assert_eq!(RetryPolicy::none().max_attempts, 1);
    }
}
