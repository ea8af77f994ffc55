use std::sync::Arc;

use tabled::Table;

use crate::{
    cli::{end_session_if_needed, load_client, spinner},
    config::Config,
    error, info,
    spotify::{self, SpotifyClient},
    types::{Track, TrackTableRow},
    utils, warning,
};

pub async fn tracks(config: Arc<Config>, playlist: String) {
    let client = match load_client(&config).await {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    let pb = spinner("Fetching tracks...");
    let result = fetch(&client, &playlist).await;
    pb.finish_and_clear();

    let (name, tracks) = match result {
        Ok(found) => found,
        Err(e) => {
            end_session_if_needed(&config, &e).await;
            error!("Failed to load tracks: {}", e)
        }
    };

    info!("{} ({} tracks)", name, tracks.len());
    if tracks.is_empty() {
        warning!("Playlist is empty.");
        return;
    }

    print_tracks(tracks);
}

pub(crate) fn print_tracks(tracks: Vec<Track>) {
    let rows: Vec<TrackTableRow> = tracks
        .into_iter()
        .enumerate()
        .map(|(i, track)| table_row(i + 1, track))
        .collect();
    println!("{}", Table::new(rows));
}

/// Name and tracks of a playlist reference, `liked` meaning Liked Songs.
async fn fetch(
    client: &SpotifyClient,
    reference: &str,
) -> Result<(String, Vec<Track>), crate::error::Error> {
    let source = spotify::playlists::find_source(client, reference).await?;
    let tracks = spotify::tracks::source_tracks(client, &source).await?;
    Ok((source.name().to_string(), tracks))
}

fn table_row(position: usize, track: Track) -> TrackTableRow {
    TrackTableRow {
        position,
        artists: track.artist_names(),
        album: track.album.map(|a| a.name).unwrap_or_default(),
        duration: utils::format_duration(track.duration_ms),
        id: track.id.unwrap_or_else(|| track.uri.clone()),
        title: track.name,
    }
}
