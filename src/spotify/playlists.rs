use crate::{
    error::Error,
    spotify::{client::SpotifyClient, library},
    types::{CreatePlaylistRequest, MoveSource, Playlist},
    utils,
};

const PAGE_LIMIT: u32 = 50;

/// Every playlist the user owns or follows.
pub async fn list(client: &SpotifyClient) -> Result<Vec<Playlist>, Error> {
    client
        .get_all_pages(&format!("me/playlists?limit={}", PAGE_LIMIT))
        .await
}

/// Fetches a single playlist by id.
///
/// # Arguments
///
/// * `client` - Authenticated API client
/// * `playlist_id` - Bare playlist id
///
/// # Returns
///
/// The playlist, or an `Api` error carrying Spotify's message (`404` for
/// unknown ids).
pub async fn get(client: &SpotifyClient, playlist_id: &str) -> Result<Playlist, Error> {
    client
        .get_json(&format!("playlists/{}", urlencoding::encode(playlist_id)))
        .await
}

/// Resolves a playlist given by URI, link, id or name.
///
/// URIs and links are looked up directly, anything else is matched against
/// the user's playlists.
pub async fn find(client: &SpotifyClient, reference: &str) -> Result<Playlist, Error> {
    if let Some(id) = utils::parse_playlist_ref(reference) {
        return get(client, &id).await;
    }

    let playlists = list(client).await?;
    resolve(&playlists, reference).cloned()
}

/// Resolves the source of a move: `liked` for Liked Songs, anything else as
/// in [`find`].
pub async fn find_source(client: &SpotifyClient, reference: &str) -> Result<MoveSource, Error> {
    if library::is_liked_ref(reference) {
        return Ok(MoveSource::Liked);
    }
    find(client, reference).await.map(MoveSource::Playlist)
}

/// Creates a playlist owned by `user_id`.
///
/// # Arguments
///
/// * `client` - Authenticated API client
/// * `user_id` - Id of the current user, playlists can only be created for oneself
/// * `name` - Name of the new playlist
/// * `description` - Description shown below the name, may be empty
/// * `public` - Whether the playlist appears on the user's profile
///
/// # Returns
///
/// The created playlist as returned by Spotify.
pub async fn create(
    client: &SpotifyClient,
    user_id: &str,
    name: &str,
    description: &str,
    public: bool,
) -> Result<Playlist, Error> {
    let request = CreatePlaylistRequest {
        name: name.to_string(),
        description: description.to_string(),
        public,
    };
    client
        .post_json(
            &format!("users/{}/playlists", urlencoding::encode(user_id)),
            &request,
        )
        .await
}

/// Picks the playlist matching `reference` by exact id first, then by
/// case-insensitive name.
pub fn resolve<'a>(playlists: &'a [Playlist], reference: &str) -> Result<&'a Playlist, Error> {
    let reference = reference.trim();
    if let Some(playlist) = playlists.iter().find(|p| p.id == reference) {
        return Ok(playlist);
    }

    let needle = reference.to_lowercase();
    let matches: Vec<&Playlist> = playlists
        .iter()
        .filter(|p| p.name.to_lowercase() == needle)
        .collect();

    match matches.as_slice() {
        [] => Err(Error::PlaylistNotFound(reference.to_string())),
        [playlist] => Ok(*playlist),
        many => Err(Error::AmbiguousPlaylist {
            reference: reference.to_string(),
            count: many.len(),
        }),
    }
}
