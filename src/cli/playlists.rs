use std::sync::Arc;

use tabled::Table;

use crate::{
    cli::{end_session_if_needed, load_client, spinner},
    config::Config,
    error, info,
    spotify::{self, SpotifyClient},
    success,
    types::{Playlist, PlaylistTableRow},
    warning,
};

pub async fn playlists(config: Arc<Config>, search: Option<String>, owned: bool) {
    let client = match load_client(&config).await {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    let pb = spinner("Fetching playlists...");
    let result = fetch(&client, owned).await;
    pb.finish_and_clear();

    let mut playlists = match result {
        Ok(playlists) => playlists,
        Err(e) => {
            end_session_if_needed(&config, &e).await;
            error!("Failed to load playlists: {}", e)
        }
    };

    if let Some(search) = search {
        let search_term = search.to_lowercase();
        playlists.retain(|p| p.name.to_lowercase().contains(&search_term));
    }

    if playlists.is_empty() {
        warning!("No playlists found.");
        return;
    }

    let rows: Vec<PlaylistTableRow> = playlists.into_iter().map(table_row).collect();
    println!("{}", Table::new(rows));
}

pub async fn create(config: Arc<Config>, name: String, description: Option<String>, public: bool) {
    let client = match load_client(&config).await {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    let pb = spinner("Creating playlist...");
    let result = create_for_current_user(&client, &name, description.as_deref(), public).await;
    pb.finish_and_clear();

    match result {
        Ok(playlist) => {
            success!("Created playlist '{}'", playlist.name);
            info!("Id: {}", playlist.id);
        }
        Err(e) => {
            end_session_if_needed(&config, &e).await;
            error!("Failed to create playlist: {}", e)
        }
    }
}

async fn create_for_current_user(
    client: &SpotifyClient,
    name: &str,
    description: Option<&str>,
    public: bool,
) -> Result<Playlist, crate::error::Error> {
    let user = spotify::profile::current_user(client).await?;
    spotify::playlists::create(client, &user.id, name, description.unwrap_or_default(), public)
        .await
}

async fn fetch(client: &SpotifyClient, owned: bool) -> Result<Vec<Playlist>, crate::error::Error> {
    let mut playlists = spotify::playlists::list(client).await?;
    if owned {
        let user = spotify::profile::current_user(client).await?;
        playlists.retain(|p| p.owner.id == user.id);
    }
    Ok(playlists)
}

fn table_row(playlist: Playlist) -> PlaylistTableRow {
    let visibility = if playlist.collaborative {
        "collaborative"
    } else {
        match playlist.public {
            Some(true) => "public",
            Some(false) => "private",
            None => "-",
        }
    };

    PlaylistTableRow {
        name: playlist.name,
        tracks: playlist.tracks.total,
        owner: playlist
            .owner
            .display_name
            .unwrap_or(playlist.owner.id),
        visibility: visibility.to_string(),
        id: playlist.id,
    }
}
