use std::sync::Arc;

use chrono::{DateTime, Local};
use tabled::Table;

use crate::{
    cli::{end_session_if_needed, load_client, spinner, tracks::print_tracks},
    config::Config,
    error, info,
    spotify::{self, SpotifyClient},
    types::{Artist, ArtistTableRow, PlayHistoryItem, TimeRange, Track},
    utils, warning,
};

/// What `plmv top` ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopKind {
    Tracks,
    Artists,
}

enum TopItems {
    Tracks(Vec<Track>),
    Artists(Vec<Artist>),
}

pub async fn top(config: Arc<Config>, kind: TopKind, range: TimeRange, limit: u32) {
    let client = match load_client(&config).await {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    let pb = spinner("Fetching your top items...");
    let result = fetch_top(&client, kind, range, limit).await;
    pb.finish_and_clear();

    let items = match result {
        Ok(items) => items,
        Err(e) => {
            end_session_if_needed(&config, &e).await;
            error!("Failed to load top items: {}", e)
        }
    };

    match items {
        TopItems::Tracks(tracks) if !tracks.is_empty() => {
            info!("Top tracks, {}", range);
            print_tracks(tracks);
        }
        TopItems::Artists(artists) if !artists.is_empty() => {
            info!("Top artists, {}", range);
            let rows: Vec<ArtistTableRow> = artists
                .into_iter()
                .enumerate()
                .map(|(i, artist)| artist_row(i + 1, artist))
                .collect();
            println!("{}", Table::new(rows));
        }
        _ => warning!("Spotify has no listening data for this period yet."),
    }
}

pub async fn recent(config: Arc<Config>, limit: u32) {
    let client = match load_client(&config).await {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    let pb = spinner("Fetching recently played tracks...");
    let result = spotify::insights::recently_played(&client, limit).await;
    pb.finish_and_clear();

    let history = match result {
        Ok(history) => history,
        Err(e) => {
            end_session_if_needed(&config, &e).await;
            error!("Failed to load recently played tracks: {}", e)
        }
    };

    if history.is_empty() {
        warning!("Nothing played recently.");
        return;
    }

    for item in history {
        print_play(&item);
    }
}

async fn fetch_top(
    client: &SpotifyClient,
    kind: TopKind,
    range: TimeRange,
    limit: u32,
) -> Result<TopItems, crate::error::Error> {
    Ok(match kind {
        TopKind::Tracks => {
            TopItems::Tracks(spotify::insights::top_tracks(client, range, limit).await?)
        }
        TopKind::Artists => {
            TopItems::Artists(spotify::insights::top_artists(client, range, limit).await?)
        }
    })
}

fn artist_row(position: usize, artist: Artist) -> ArtistTableRow {
    ArtistTableRow {
        position,
        genres: artist.genres.join(", "),
        popularity: artist
            .popularity
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string()),
        id: artist.id.unwrap_or_default(),
        name: artist.name,
    }
}

fn print_play(item: &PlayHistoryItem) {
    let played = DateTime::parse_from_rfc3339(&item.played_at)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| item.played_at.clone());

    info!(
        "{}  {} - {} ({})",
        played,
        item.track.artist_names(),
        item.track.name,
        utils::format_duration(item.track.duration_ms)
    );
}
