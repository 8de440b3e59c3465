//! Uniform error type for every SoundCloud operation.
//!
//! Each failure carries the underlying cause, a human-readable message and an
//! HTTP-style status code. Local and transport failures default to 500; remote
//! failures forward the status the API answered with.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Boxed cause attached to an [`Error`].
pub type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Status used for failures that never reached (or never came back from) the API.
pub const INTERNAL: u16 = 500;

/// The step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid configuration value.
    Config,
    /// No access token, or the token has expired.
    Unauthenticated,
    /// An audio or artwork file could not be opened or read.
    FileOpen,
    /// A file could not be attached to the multipart form.
    FormAttach,
    /// An endpoint URL could not be parsed.
    UrlParse,
    /// The HTTP request could not be constructed.
    RequestBuild,
    /// The request could not be sent or its response could not be read.
    Transport,
    /// The API answered with a non-success status.
    Remote,
    /// The response body did not match the expected shape.
    Decode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Config => "config",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::FileOpen => "file open",
            ErrorKind::FormAttach => "form attach",
            ErrorKind::UrlParse => "url parse",
            ErrorKind::RequestBuild => "request build",
            ErrorKind::Transport => "transport",
            ErrorKind::Remote => "remote",
            ErrorKind::Decode => "decode",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
#[error("{message} (status {status})")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: u16,
    #[source]
    source: Option<Cause>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: INTERNAL,
            source: None,
        }
    }

    /// Builds an error that keeps `source` as its cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl Into<Cause>,
    ) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::new(kind, message)
        }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message).status(StatusCode::UNAUTHORIZED.as_u16())
    }

    /// Maps a failed dispatch. Keeps the status when reqwest attached one.
    ///
    /// The request URL is stripped from the cause since it may carry the
    /// access token as a query parameter.
    pub fn transport(message: impl Into<String>, err: reqwest::Error) -> Self {
        let status = err.status().map_or(INTERNAL, |s| s.as_u16());
        Self::with_source(ErrorKind::Transport, message, err.without_url()).status(status)
    }

    /// A non-success answer from the API; the body text becomes the message.
    pub fn remote(status: StatusCode, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("SoundCloud answered {status}")
        } else {
            format!("SoundCloud answered {status}: {body}")
        };
        Self::new(ErrorKind::Remote, message).status(status.as_u16())
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn local_failures_default_to_500() {
        let err = Error::with_source(
            ErrorKind::FileOpen,
            "Unable to open audio file",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert_eq!(err.kind(), ErrorKind::FileOpen);
        assert_eq!(err.status_code(), 500);
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Unable to open audio file (status 500)");
    }

    #[test]
    fn remote_forwards_status_and_body() {
        let err = Error::remote(StatusCode::UNPROCESSABLE_ENTITY, " {\"errors\":[]} ");
        assert_eq!(err.kind(), ErrorKind::Remote);
        assert_eq!(err.status_code(), 422);
        assert!(err.message().ends_with("{\"errors\":[]}"));
        assert!(err.source().is_none());
    }

    #[test]
    fn remote_with_empty_body() {
        let err = Error::remote(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.message(), "SoundCloud answered 502 Bad Gateway");
    }

    #[test]
    fn unauthenticated_is_401() {
        let err = Error::unauthenticated("no token");
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.kind().to_string(), "unauthenticated");
    }
}
