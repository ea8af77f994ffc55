use std::sync::Arc;

use crate::{
    cli::{end_session_if_needed, load_client, spinner},
    config::Config,
    error,
    error::Error,
    info,
    spotify::{self, SpotifyClient},
    success,
    types::{MoveReport, MoveSource, Playlist, TrackSelection},
    utils, warning,
};

pub async fn move_tracks(
    config: Arc<Config>,
    from: String,
    to: String,
    track_refs: Vec<String>,
    all: bool,
    dry_run: bool,
) {
    let selection = match selection(&track_refs, all) {
        Ok(selection) => selection,
        Err(reference) => error!("'{}' is not a track id, URI or link", reference),
    };

    let client = match load_client(&config).await {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    let pb = spinner("Resolving playlists...");
    let result = run(&client, &from, &to, &selection, dry_run).await;
    pb.finish_and_clear();

    let (source, target, report) = match result {
        Ok(done) => done,
        Err(e) => {
            end_session_if_needed(&config, &e).await;
            error!("Failed to move tracks: {}", e)
        }
    };

    for uri in &report.missing {
        warning!("{} is not in '{}', skipped", uri, source.name());
    }
    if !report.already_in_target.is_empty() {
        info!(
            "{} track(s) already in '{}' are only removed from '{}'",
            report.already_in_target.len(),
            target.name,
            source.name()
        );
    }
    for uri in &report.skipped_local {
        warning!("{} is a local file and cannot be moved, skipped", uri);
    }

    if report.is_empty() {
        info!("Nothing to move.");
    } else if dry_run {
        info!(
            "Would move {} track(s) from '{}' to '{}'",
            report.moved.len(),
            source.name(),
            target.name
        );
    } else {
        success!(
            "Moved {} track(s) from '{}' to '{}'",
            report.moved.len(),
            source.name(),
            target.name
        );
    }
}

/// Builds the track selection from command line references. Returns the
/// first reference that can't be understood on failure.
fn selection(track_refs: &[String], all: bool) -> Result<TrackSelection, String> {
    if all {
        return Ok(TrackSelection::All);
    }

    track_refs
        .iter()
        .map(|r| utils::parse_track_ref(r).ok_or_else(|| r.clone()))
        .collect::<Result<Vec<_>, _>>()
        .map(TrackSelection::Uris)
}

async fn run(
    client: &SpotifyClient,
    from: &str,
    to: &str,
    selection: &TrackSelection,
    dry_run: bool,
) -> Result<(MoveSource, Playlist, MoveReport), Error> {
    let user = spotify::profile::current_user(client).await?;
    let source = spotify::playlists::find_source(client, from).await?;
    let target = spotify::playlists::find(client, to).await?;

    let report = if dry_run {
        spotify::tracks::preview_move(client, &user.id, &source, &target, selection).await?
    } else {
        spotify::tracks::move_tracks(client, &user.id, &source, &target, selection).await?
    };

    Ok((source, target, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_flag_wins_over_references() {
        let refs = vec!["not a track".to_string()];
        assert_eq!(selection(&refs, true), Ok(TrackSelection::All));
    }

    #[test]
    fn references_are_normalized() {
        let refs = vec![
            "4uLU6hMCjMI75M1A2tKUQC".to_string(),
            "https://open.spotify.com/track/7GhIk7Il098yCjg4BQjzvb?si=abc".to_string(),
        ];
        assert_eq!(
            selection(&refs, false),
            Ok(TrackSelection::Uris(vec![
                "spotify:track:4uLU6hMCjMI75M1A2tKUQC".to_string(),
                "spotify:track:7GhIk7Il098yCjg4BQjzvb".to_string(),
            ]))
        );
    }

    #[test]
    fn bad_reference_is_reported() {
        let refs = vec!["spotify:album:1".to_string()];
        assert_eq!(selection(&refs, false), Err("spotify:album:1".to_string()));
    }
}
