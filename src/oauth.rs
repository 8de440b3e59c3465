//! OAuth 2.0 authorization-code helper.
//!
//! Holds the application identity, the token obtained for a user and the HTTP
//! client every authenticated request goes through. Knows nothing about
//! SoundCloud beyond the standard OAuth form fields.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::{
    Res,
    error::{Error, ErrorKind},
    types::{Token, TokenResponse},
};

/// Application credentials plus the token granted by the user.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    token: Option<Token>,
    http: Client,
}

impl OAuthClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
        http: Client,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            token: None,
            http,
        }
    }

    /// Attaches an already issued token, e.g. one handed over on the command line.
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Returns the access token, failing when none is held or it has expired.
    pub fn access_token(&self) -> Res<&str> {
        match &self.token {
            None => Err(Error::unauthenticated(
                "No access token. Please run scloud auth",
            )),
            Some(t) if t.access_token.is_empty() => {
                Err(Error::unauthenticated("Access token is empty"))
            }
            Some(t) if t.is_expired() => Err(Error::unauthenticated(
                "Access token has expired. Please run scloud auth",
            )),
            Some(t) => Ok(&t.access_token),
        }
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

/// Builds the HTTP client shared by all requests of a session.
pub fn http_client(timeout: Duration) -> Res<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::with_source(ErrorKind::Config, "Unable to build HTTP client", e))
}

/// Appends `params` as the query of `base`, replacing any existing query.
pub fn sign_in_url(base: &Url, params: &[(&str, &str)]) -> String {
    let mut url = base.clone();
    url.query_pairs_mut().clear().extend_pairs(params);
    url.into()
}

/// Exchanges an authorization code for a token and stores it on `client`.
///
/// The client is left without a token when the exchange fails.
pub async fn exchange(client: &mut OAuthClient, code: &str, token_url: &str) -> Res<()> {
    client.token = None;

    let request = client
        .http
        .post(token_url)
        .form(&[
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
            ("redirect_uri", client.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
        ])
        .build()
        .map_err(|e| Error::with_source(ErrorKind::RequestBuild, "Can't make token request", e))?;

    let response = client
        .http
        .execute(request)
        .await
        .map_err(|e| Error::transport("Error with token request", e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::transport("Unable to read token response", e))?;

    if !status.is_success() {
        return Err(Error::remote(status, &body));
    }

    let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
        Error::with_source(ErrorKind::Decode, "Unable to decode token response JSON", e)
    })?;
    if token.access_token.is_empty() {
        return Err(Error::new(
            ErrorKind::Decode,
            "Token response carried an empty access token",
        ));
    }

    log::debug!(
        "token exchange succeeded (scope: {}, expires_in: {:?})",
        token.scope,
        token.expires_in
    );
    client.token = Some(token.into());
    Ok(())
}
