use crate::{
    error::Error,
    spotify::client::SpotifyClient,
    types::{SavedTrack, Track},
    utils,
};

const PAGE_LIMIT: u32 = 50;

/// `DELETE /me/tracks` accepts at most 50 ids per request.
pub const MAX_IDS_PER_REQUEST: usize = 50;

/// Reference naming Liked Songs on the command line.
pub const LIKED: &str = "liked";

pub fn is_liked_ref(reference: &str) -> bool {
    reference.trim().eq_ignore_ascii_case(LIKED)
}

/// Every track in the user's Liked Songs, most recently saved first.
///
/// # Arguments
///
/// * `client` - Authenticated API client
///
/// # Returns
///
/// The saved tracks in the order Spotify returns them, all pages collected.
pub async fn liked_tracks(client: &SpotifyClient) -> Result<Vec<Track>, Error> {
    let items: Vec<SavedTrack> = client
        .get_all_pages(&format!("me/tracks?limit={}", PAGE_LIMIT))
        .await?;

    Ok(items.into_iter().map(|item| item.track).collect())
}

/// Removes tracks from Liked Songs, given as `spotify:track:` URIs.
///
/// URIs without a track id (local files) are ignored, the library can't
/// hold them.
pub async fn remove(client: &SpotifyClient, uris: &[String]) -> Result<(), Error> {
    let ids: Vec<&str> = uris.iter().filter_map(|uri| utils::track_id(uri)).collect();

    for chunk in ids.chunks(MAX_IDS_PER_REQUEST) {
        client
            .delete(&format!("me/tracks?ids={}", chunk.join(",")))
            .await?;
    }

    Ok(())
}
