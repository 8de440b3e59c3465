//! # API Module
//!
//! HTTP endpoints of the short-lived local server used by `scloud auth`.
//!
//! - [`callback`] - Receives SoundCloud's redirect after the user granted
//!   access and exchanges the authorization code for an access token.
//! - [`health`] - Returns status and version information.
//!
//! Both are plain async handlers meant for an Axum [`Router`](axum::Router):
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use scloud::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
