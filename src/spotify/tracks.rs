use std::collections::HashSet;

use crate::{
    error::Error,
    spotify::{client::SpotifyClient, library},
    types::{
        AddTracksRequest, MoveReport, MoveSource, Playlist, PlaylistItem, RemoveTracksRequest,
        SnapshotResponse, Track, TrackSelection, TrackUri,
    },
    utils,
};

const PAGE_LIMIT: u32 = 100;

/// Playlist modification endpoints accept at most 100 tracks per request.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// Tracks of a playlist in playlist order. Entries whose track is no longer
/// available are left out.
pub async fn list(client: &SpotifyClient, playlist_id: &str) -> Result<Vec<Track>, Error> {
    let items: Vec<PlaylistItem> = client
        .get_all_pages(&format!(
            "playlists/{}/tracks?limit={}",
            urlencoding::encode(playlist_id),
            PAGE_LIMIT
        ))
        .await?;

    Ok(items.into_iter().filter_map(|item| item.track).collect())
}

/// Appends tracks to a playlist, returning the last snapshot id.
///
/// Requests are split into chunks of [`MAX_TRACKS_PER_REQUEST`]. An empty
/// `uris` sends nothing and returns `None`.
pub async fn add(
    client: &SpotifyClient,
    playlist_id: &str,
    uris: &[String],
) -> Result<Option<String>, Error> {
    let path = format!("playlists/{}/tracks", urlencoding::encode(playlist_id));
    let mut snapshot = None;

    for chunk in uris.chunks(MAX_TRACKS_PER_REQUEST) {
        let request = AddTracksRequest {
            uris: chunk.to_vec(),
        };
        let response: SnapshotResponse = client.post_json(&path, &request).await?;
        snapshot = Some(response.snapshot_id);
    }

    Ok(snapshot)
}

/// Removes every occurrence of the given tracks from a playlist.
///
/// The first request carries `snapshot_id`, every later one the snapshot id
/// returned by the request before it.
pub async fn remove(
    client: &SpotifyClient,
    playlist_id: &str,
    uris: &[String],
    snapshot_id: Option<String>,
) -> Result<Option<String>, Error> {
    let path = format!("playlists/{}/tracks", urlencoding::encode(playlist_id));
    let mut snapshot = snapshot_id;

    for chunk in uris.chunks(MAX_TRACKS_PER_REQUEST) {
        let request = RemoveTracksRequest {
            tracks: chunk.iter().map(|uri| TrackUri { uri: uri.clone() }).collect(),
            snapshot_id: snapshot.clone(),
        };
        let response: SnapshotResponse = client.delete_json(&path, &request).await?;
        snapshot = Some(response.snapshot_id);
    }

    Ok(snapshot)
}

/// Works out which of the selected tracks can be moved out of `source_tracks`.
///
/// The returned report lists what will be added to the target, what the
/// target already holds (removed from the source only), what was asked for
/// but is not in the source, and local files, which the API cannot add
/// anywhere.
pub fn plan_move(
    source_tracks: &[Track],
    target_tracks: &[Track],
    selection: &TrackSelection,
) -> MoveReport {
    let mut requested: Vec<String> = match selection {
        TrackSelection::All => source_tracks.iter().map(|t| t.uri.clone()).collect(),
        TrackSelection::Uris(uris) => uris.clone(),
    };
    utils::dedup_preserving_order(&mut requested);

    let available: HashSet<&str> = source_tracks.iter().map(|t| t.uri.as_str()).collect();
    let local: HashSet<&str> = source_tracks
        .iter()
        .filter(|t| t.is_local)
        .map(|t| t.uri.as_str())
        .collect();
    let in_target: HashSet<&str> = target_tracks.iter().map(|t| t.uri.as_str()).collect();

    let mut report = MoveReport::default();
    for uri in requested {
        if !available.contains(uri.as_str()) {
            report.missing.push(uri);
        } else if local.contains(uri.as_str()) || uri.starts_with("spotify:local:") {
            report.skipped_local.push(uri);
        } else if in_target.contains(uri.as_str()) {
            report.already_in_target.push(uri);
        } else {
            report.moved.push(uri);
        }
    }
    report
}

/// Checks that `user_id` may move tracks from `source` into `target`.
///
/// # Errors
///
/// * `SamePlaylist` - source and target are the same playlist
/// * `NotEditable` - the target, or a playlist source, is neither owned by
///   the user nor collaborative
pub fn validate_move(user_id: &str, source: &MoveSource, target: &Playlist) -> Result<(), Error> {
    if matches!(source, MoveSource::Playlist(p) if p.id == target.id) {
        return Err(Error::SamePlaylist);
    }
    if !target.is_editable_by(user_id) {
        return Err(Error::NotEditable(target.name.clone()));
    }
    match source {
        MoveSource::Playlist(p) if !p.is_editable_by(user_id) => {
            Err(Error::NotEditable(p.name.clone()))
        }
        _ => Ok(()),
    }
}

/// Tracks of a move source in source order.
pub async fn source_tracks(client: &SpotifyClient, source: &MoveSource) -> Result<Vec<Track>, Error> {
    match source {
        MoveSource::Liked => library::liked_tracks(client).await,
        MoveSource::Playlist(playlist) => list(client, &playlist.id).await,
    }
}

/// Validates a move and works out what it would do without changing
/// anything. Used as is for dry runs.
pub async fn preview_move(
    client: &SpotifyClient,
    user_id: &str,
    source: &MoveSource,
    target: &Playlist,
    selection: &TrackSelection,
) -> Result<MoveReport, Error> {
    validate_move(user_id, source, target)?;

    let source_tracks = source_tracks(client, source).await?;
    let target_tracks = list(client, &target.id).await?;
    Ok(plan_move(&source_tracks, &target_tracks, selection))
}

/// Moves tracks from `source` to `target` on behalf of `user_id`.
///
/// Tracks are added to the target before they are removed from the source so
/// an interrupted move leaves duplicates rather than losing tracks. Tracks the
/// target already holds are not added a second time.
///
/// # Arguments
///
/// * `client` - Authenticated API client
/// * `user_id` - Id of the current user, checked against playlist owners
/// * `source` - Playlist or Liked Songs to take the tracks from
/// * `target` - Playlist receiving the tracks
/// * `selection` - All tracks of the source or an explicit list of URIs
///
/// # Returns
///
/// A [`MoveReport`] of what was moved and what was skipped.
pub async fn move_tracks(
    client: &SpotifyClient,
    user_id: &str,
    source: &MoveSource,
    target: &Playlist,
    selection: &TrackSelection,
) -> Result<MoveReport, Error> {
    let report = preview_move(client, user_id, source, target, selection).await?;
    if report.is_empty() {
        return Ok(report);
    }

    add(client, &target.id, &report.moved).await?;
    match source {
        MoveSource::Liked => library::remove(client, &report.removed()).await?,
        MoveSource::Playlist(playlist) => {
            remove(
                client,
                &playlist.id,
                &report.removed(),
                Some(playlist.snapshot_id.clone()),
            )
            .await?;
        }
    }

    Ok(report)
}
