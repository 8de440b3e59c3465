use tabled::Table;

use crate::{config::Config, error, info, soundcloud, types::TrackTableRow, utils};

pub async fn list_tracks(config: &Config) {
    let client = super::authorized_client(config);

    let pb = utils::spinner("Fetching tracks...");
    let result = soundcloud::tracks::get_tracks(config, &client).await;
    pb.finish_and_clear();

    let tracks = match result {
        Ok(tracks) => tracks,
        Err(e) => error!("Failed to load tracks. Err: {}", e),
    };

    if tracks.is_empty() {
        info!("No tracks found.");
        return;
    }

    let rows: Vec<TrackTableRow> = tracks.into_iter().map(TrackTableRow::from).collect();
    println!("{}", Table::new(rows));
}
