use crate::{
    error::Error,
    spotify::client::SpotifyClient,
    types::{Artist, Page, PlayHistory, PlayHistoryItem, TimeRange, Track},
};

/// Largest `limit` the top items and history endpoints accept.
pub const MAX_LIMIT: u32 = 50;

pub const DEFAULT_LIMIT: u32 = 10;

fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_LIMIT)
}

/// The user's most played tracks over `range`.
///
/// # Arguments
///
/// * `client` - Authenticated API client
/// * `range` - Period to aggregate over
/// * `limit` - Number of tracks, clamped to `1..=50`
///
/// # Returns
///
/// Tracks ordered by affinity, highest first.
pub async fn top_tracks(
    client: &SpotifyClient,
    range: TimeRange,
    limit: u32,
) -> Result<Vec<Track>, Error> {
    let page: Page<Track> = client
        .get_json(&format!(
            "me/top/tracks?time_range={}&limit={}",
            range.as_str(),
            clamp_limit(limit)
        ))
        .await?;
    Ok(page.items)
}

/// The user's most played artists over `range`, highest affinity first.
pub async fn top_artists(
    client: &SpotifyClient,
    range: TimeRange,
    limit: u32,
) -> Result<Vec<Artist>, Error> {
    let page: Page<Artist> = client
        .get_json(&format!(
            "me/top/artists?time_range={}&limit={}",
            range.as_str(),
            clamp_limit(limit)
        ))
        .await?;
    Ok(page.items)
}

/// Most recently played tracks, newest first.
pub async fn recently_played(
    client: &SpotifyClient,
    limit: u32,
) -> Result<Vec<PlayHistoryItem>, Error> {
    let history: PlayHistory = client
        .get_json(&format!(
            "me/player/recently-played?limit={}",
            clamp_limit(limit)
        ))
        .await?;
    Ok(history.items)
}
