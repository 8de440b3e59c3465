use crate::{
    Res,
    config::Config,
    oauth::{self, OAuthClient},
    types::Token,
};

/// Returns the URL where the user grants the application access.
///
/// The URL carries exactly four query parameters: `client_id`,
/// `redirect_uri`, `response_type=code` and `scope=non-expiring`.
///
/// # Example
///
/// ```
/// let url = sign_in_url(&config);
/// // https://soundcloud.com/connect?client_id=...&redirect_uri=...&response_type=code&scope=non-expiring
/// ```
pub fn sign_in_url(config: &Config) -> String {
    oauth::sign_in_url(
        &config.connect_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", "non-expiring"),
        ],
    )
}

/// Exchanges the authorization code the user was redirected with for an
/// access token.
///
/// # Arguments
///
/// * `config` - Application identity and endpoints
/// * `code` - Single-use code from the redirect after user consent
///
/// # Returns
///
/// An [`OAuthClient`] holding the token, ready for authenticated calls. Any
/// failure of the exchange is returned as is; nothing is retried.
pub async fn auth(config: &Config, code: &str) -> Res<OAuthClient> {
    let mut client = new_client(config)?;
    oauth::exchange(&mut client, code, &config.token_url()).await?;
    Ok(client)
}

/// Builds a client around a token obtained earlier, e.g. from
/// `SOUNDCLOUD_ACCESS_TOKEN`.
pub fn client_with_token(config: &Config, access_token: &str) -> Res<OAuthClient> {
    Ok(new_client(config)?.with_token(Token::new(access_token)))
}

fn new_client(config: &Config) -> Res<OAuthClient> {
    Ok(OAuthClient::new(
        config.client_id.clone(),
        config.client_secret.clone(),
        config.redirect_uri.clone(),
        oauth::http_client(config.timeout)?,
    ))
}
