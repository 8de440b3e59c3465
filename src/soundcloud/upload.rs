use std::path::Path;

use reqwest::multipart::{Form, Part};
use tokio::{fs::File, io::AsyncReadExt};

use crate::{
    Res,
    config::Config,
    error::{Error, ErrorKind},
    oauth::OAuthClient,
    types::{UploadRequest, UploadedTrack},
    utils,
};

/// Uploads an audio file, with optional artwork, as a new SoundCloud track.
///
/// Both files are read before anything is sent, so a missing audio or artwork
/// file fails without touching the network. The request is sent once; a
/// failed upload is never retried because the API offers no idempotency key.
///
/// # Form Fields
///
/// - `oauth_token` - access token of `client`
/// - `track[title]`, `track[sharing]` - from `request`
/// - `track[asset_data]` - audio file
/// - `track[artwork_data]` - artwork file, only when `request.artwork` is set
///
/// # Errors
///
/// - `Unauthenticated` (401) when `client` has no usable token
/// - `FileOpen` when a file cannot be opened or read
/// - `FormAttach` when a file part cannot be built
/// - `RequestBuild`, `Transport` for request construction and dispatch
/// - `Remote` with the forwarded status for non-success answers
/// - `Decode` when the answer is not a track object with an `id`
pub async fn upload(
    config: &Config,
    client: &OAuthClient,
    request: &UploadRequest,
) -> Res<UploadedTrack> {
    let token = client.access_token()?;

    let audio = file_part(&request.path, "audio").await?;
    let artwork = match &request.artwork {
        Some(path) => Some(file_part(path, "artwork").await?),
        None => None,
    };

    let mut form = Form::new()
        .text("oauth_token", token.to_string())
        .text("track[title]", request.title.clone())
        .text("track[sharing]", request.sharing.as_str())
        .part("track[asset_data]", audio);
    if let Some(artwork) = artwork {
        form = form.part("track[artwork_data]", artwork);
    }

    let http_request = client
        .http()
        .post(config.endpoint("tracks.json"))
        .multipart(form)
        .build()
        .map_err(|e| Error::with_source(ErrorKind::RequestBuild, "Can't make request", e))?;

    log::debug!(
        "uploading {} as '{}' ({})",
        request.path.display(),
        request.title,
        request.sharing
    );

    let response = client
        .http()
        .execute(http_request)
        .await
        .map_err(|e| Error::transport("Error with request", e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::transport("Unable to read response", e))?;
    log::debug!("upload answered {status}");

    if !status.is_success() {
        return Err(Error::remote(status, &body));
    }

    let uploaded: UploadedTrack = serde_json::from_str(&body).map_err(|e| {
        Error::with_source(ErrorKind::Decode, "Unable to decode upload response JSON", e)
    })?;
    log::info!(
        "uploaded track {} ({})",
        uploaded.id,
        uploaded.permalink_url
    );

    Ok(uploaded)
}

async fn file_part(path: &Path, what: &str) -> Res<Part> {
    let contents = read_file(path, what).await?;
    Part::bytes(contents)
        .file_name(utils::file_name_of(path))
        .mime_str(utils::mime_type_for_path(path))
        .map_err(|e| {
            Error::with_source(
                ErrorKind::FormAttach,
                format!("Unable to attach {what} file to form"),
                e,
            )
        })
}

async fn read_file(path: &Path, what: &str) -> Res<Vec<u8>> {
    let mut file = File::open(path).await.map_err(|e| {
        Error::with_source(
            ErrorKind::FileOpen,
            format!("Unable to open {what} file {}", path.display()),
            e,
        )
    })?;

    let mut contents = Vec::new();
    file.read_to_end(&mut contents).await.map_err(|e| {
        Error::with_source(
            ErrorKind::FileOpen,
            format!("Unable to read {what} file {}", path.display()),
            e,
        )
    })?;
    Ok(contents)
}
