//! # SoundCloud Integration Module
//!
//! Thin client for the parts of the SoundCloud HTTP API the CLI needs. Every
//! operation is a single request/response round trip built on the
//! [`crate::oauth`] helper and `reqwest`.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer
//!     ↓
//! SoundCloud Integration Layer
//!     ├── Authentication (sign-in URL, code exchange)
//!     ├── Upload (multipart track creation)
//!     └── Tracks (listing the user's tracks)
//!     ↓
//! OAuth helper + HTTP layer (reqwest, JSON)
//!     ↓
//! SoundCloud API
//! ```
//!
//! ## API Coverage
//!
//! - `GET  https://soundcloud.com/connect` - user consent page
//! - `POST /oauth2/token` - authorization code exchange
//! - `POST /tracks.json` - track upload
//! - `GET  /me/tracks.json` - tracks of the authenticated user
//!
//! SoundCloud expects the access token as the `oauth_token` form field or query
//! parameter on these endpoints.
//!
//! ## Error Handling
//!
//! All functions return [`crate::Res`]; failures carry an
//! [`ErrorKind`](crate::error::ErrorKind) naming the step that failed and the
//! HTTP status the API answered with (500 for local failures). Only listing is
//! retried, since it is idempotent. Uploads are sent exactly once.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = Config::from_env()?;
//! println!("{}", soundcloud::auth::sign_in_url(&config));
//!
//! let client = soundcloud::auth::auth(&config, &code).await?;
//! let tracks = soundcloud::tracks::get_tracks(&config, &client).await?;
//!
//! let request = UploadRequest::new("song.mp3", "My Song").sharing(Sharing::Private);
//! let uploaded = soundcloud::upload::upload(&config, &client, &request).await?;
//! ```

pub mod auth;
pub mod tracks;
pub mod upload;
