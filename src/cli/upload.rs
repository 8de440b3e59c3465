use std::path::PathBuf;

use crate::{
    config::Config,
    error, info, soundcloud, success,
    types::{Sharing, UploadRequest},
    utils,
};

/// Uploads `path` and reports the new track.
///
/// Title falls back to `SOUNDCLOUD_TRACK_TITLE`, then to the file stem.
/// Sharing falls back to `SOUNDCLOUD_TRACK_SHARING`. Artwork falls back to
/// `SOUNDCLOUD_ARTWORK_PATH` unless `no_artwork` is set.
pub async fn upload(
    config: &Config,
    path: PathBuf,
    title: Option<String>,
    sharing: Option<Sharing>,
    artwork: Option<PathBuf>,
    no_artwork: bool,
) {
    let client = super::authorized_client(config);

    let title = title
        .or_else(|| config.default_title.clone())
        .unwrap_or_else(|| utils::title_from_path(&path));
    let artwork = if no_artwork {
        None
    } else {
        artwork.or_else(|| config.artwork.clone())
    };
    let request = UploadRequest::new(path, title)
        .sharing(sharing.unwrap_or(config.default_sharing))
        .artwork(artwork);

    let pb = utils::spinner("Uploading track...");
    let result = soundcloud::upload::upload(config, &client, &request).await;
    pb.finish_and_clear();

    match result {
        Ok(track) => {
            success!("Uploaded '{}' (id {}).", request.title, track.id);
            if !track.permalink_url.is_empty() {
                info!("{}", track.permalink_url);
            }
        }
        Err(e) => error!("Upload failed. Err: {}", e),
    }
}
