//! # CLI Module
//!
//! User-facing commands of `scloud`. Each command delegates to
//! [`crate::soundcloud`] and handles progress feedback, output formatting and
//! error presentation.
//!
//! ## Commands
//!
//! - [`sign_in`] - Prints the SoundCloud sign-in URL
//! - [`auth`] - Runs the authorization flow and prints the access token
//! - [`upload`] - Uploads an audio file as a new track
//! - [`list_tracks`] - Shows the authenticated user's tracks as a table
//!
//! ## Usage Patterns
//!
//! ```bash
//! scloud auth                                   # Authorize in the browser
//! export SOUNDCLOUD_ACCESS_TOKEN=...            # Token printed by auth
//! scloud upload song.mp3 --title "My Song"      # Upload with default artwork
//! scloud upload demo.wav --sharing private --no-artwork
//! scloud tracks                                 # List your tracks
//! ```
//!
//! Fatal errors are printed with the crate's `error!` macro, which exits the
//! process with status 1.

mod auth;
mod tracks;
mod upload;

pub use auth::auth;
pub use auth::sign_in;
pub use tracks::list_tracks;
pub use upload::upload;

use crate::{config, config::Config, error, oauth::OAuthClient, soundcloud};

/// Builds a client from `SOUNDCLOUD_ACCESS_TOKEN`, exiting when it is unset.
fn authorized_client(config: &Config) -> OAuthClient {
    let Some(token) = config::access_token() else {
        error!(
            "No access token found. Please run scloud auth and export {}",
            config::ACCESS_TOKEN
        );
    };

    match soundcloud::auth::client_with_token(config, &token) {
        Ok(client) => client,
        Err(e) => error!("Cannot create SoundCloud client. Err: {}", e),
    }
}
