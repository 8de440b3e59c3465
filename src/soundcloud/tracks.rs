use std::time::Duration;

use reqwest::{StatusCode, Url, header::HeaderMap};
use tokio::time::sleep;

use crate::{
    Res,
    config::Config,
    error::{Error, ErrorKind},
    oauth::OAuthClient,
    types::{RetryPolicy, Track},
    warning,
};

/// Longest `Retry-After` the listing is willing to wait for.
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Retrieves the tracks of the authenticated user.
///
/// Calls `GET /me/tracks.json?oauth_token=...` and decodes the JSON array in
/// the order SoundCloud returns it.
///
/// # Retry Logic
///
/// Listing is idempotent, so transport errors, `429 Too Many Requests` and
/// `5xx` answers are retried under `config.list_retry`. Between attempts the
/// function waits the policy's backoff, or the `Retry-After` header when the
/// server sends one of at most 120 seconds. Other statuses fail immediately.
///
/// # Errors
///
/// - `Unauthenticated` (401) when `client` has no usable token
/// - `UrlParse` when the endpoint URL cannot be built
/// - `RequestBuild`, `Transport` for request construction and dispatch
/// - `Remote` with the forwarded status once retries are exhausted
/// - `Decode` when the body is not a JSON array of tracks; no partial result
///   is returned
///
/// # Example
///
/// ```
/// let tracks = get_tracks(&config, &client).await?;
/// for track in tracks {
///     println!("{} - {}", track.title, track.permalink_url);
/// }
/// ```
pub async fn get_tracks(config: &Config, client: &OAuthClient) -> Res<Vec<Track>> {
    get_tracks_with_policy(config, client, config.list_retry).await
}

pub async fn get_tracks_with_policy(
    config: &Config,
    client: &OAuthClient,
    policy: RetryPolicy,
) -> Res<Vec<Track>> {
    let token = client.access_token()?;

    let mut url = Url::parse(&config.endpoint("me/tracks.json"))
        .map_err(|e| Error::with_source(ErrorKind::UrlParse, "Could not parse url", e))?;
    url.query_pairs_mut().append_pair("oauth_token", token);

    let mut attempt = 1;
    loop {
        let request = client
            .http()
            .get(url.clone())
            .build()
            .map_err(|e| Error::with_source(ErrorKind::RequestBuild, "Can't make request", e))?;

        let retries_left = attempt < policy.max_attempts;
        let response = match client.http().execute(request).await {
            Ok(response) => response,
            Err(e) if retries_left => {
                log::warn!(
                    "listing tracks failed on attempt {attempt}: {}",
                    e.without_url()
                );
                sleep(policy.backoff).await;
                attempt += 1;
                continue;
            }
            Err(e) => return Err(Error::transport("Error with request", e)),
        };

        let status = response.status();
        if retries_left && is_retryable(status) {
            let delay = retry_delay(response.headers(), policy.backoff);
            log::warn!(
                "listing tracks answered {status} on attempt {attempt}, retrying in {}s",
                delay.as_secs()
            );
            sleep(delay).await;
            attempt += 1;
            continue;
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport("Unable to read response", e))?;

        if !status.is_success() {
            return Err(Error::remote(status, &body));
        }

        let tracks: Vec<Track> = serde_json::from_str(&body).map_err(|e| {
            Error::with_source(ErrorKind::Decode, "Unable to decode response JSON", e)
        })?;
        log::debug!("listed {} tracks in {attempt} attempt(s)", tracks.len());

        return Ok(tracks);
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn retry_delay(headers: &HeaderMap, backoff: Duration) -> Duration {
    let retry_after = headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    match retry_after {
        Some(secs) if secs <= MAX_RETRY_AFTER_SECS => Duration::from_secs(secs),
        Some(secs) => {
            warning!(
                "Retry after has reached an abnormal high of {} seconds, using {}s instead.",
                secs,
                backoff.as_secs()
            );
            backoff
        }
        None => backoff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_statuses() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(is_retryable(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_retryable(StatusCode::UNAUTHORIZED));
        assert!(!is_retryable(StatusCode::NOT_FOUND));
    }

    fn retry_after(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(reqwest::header::RETRY_AFTER, value.parse().unwrap());
        headers
    }

    #[test]
    fn retry_after_within_limit_is_used() {
        let backoff = Duration::from_secs(2);
        assert_eq!(retry_delay(&retry_after("5"), backoff), Duration::from_secs(5));
        assert_eq!(retry_delay(&retry_after("120"), backoff), Duration::from_secs(120));
    }

    #[test]
    fn retry_after_above_limit_falls_back_to_backoff() {
        let backoff = Duration::from_secs(2);
        assert_eq!(retry_delay(&retry_after("500"), backoff), backoff);
    }

    #[test]
    fn missing_or_invalid_retry_after_uses_backoff() {
        let backoff = Duration::from_secs(3);
        assert_eq!(retry_delay(&HeaderMap::new(), backoff), backoff);
        assert_eq!(retry_delay(&retry_after("soon"), backoff), backoff);
    }
}
