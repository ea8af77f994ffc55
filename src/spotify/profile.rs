use crate::{error::Error, spotify::client::SpotifyClient, types::User};

/// Profile of the user the token belongs to (`GET /me`).
pub async fn current_user(client: &SpotifyClient) -> Result<User, Error> {
    client.get_json("me").await
}
