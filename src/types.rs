use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Token {
    pub fn expires_at(&self) -> u64 {
        self.obtained_at.saturating_add(self.expires_in)
    }
}

/// Successful answer of the token endpoint, for both code exchange and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// Error body of the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantFlow {
    AuthorizationCode,
    Implicit,
}

impl GrantFlow {
    pub fn response_type(&self) -> &'static str {
        match self {
            GrantFlow::AuthorizationCode => "code",
            GrantFlow::Implicit => "token",
        }
    }
}

impl FromStr for GrantFlow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "code" | "authorization_code" | "pkce" => Ok(GrantFlow::AuthorizationCode),
            "implicit" | "token" => Ok(GrantFlow::Implicit),
            other => Err(format!("unknown grant flow '{}'", other)),
        }
    }
}

impl fmt::Display for GrantFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantFlow::AuthorizationCode => write!(f, "authorization code"),
            GrantFlow::Implicit => write!(f, "implicit"),
        }
    }
}

/// An authorization request that was sent to the browser and is waiting for
/// the redirect to hit the local callback server.
#[derive(Debug, Clone)]
pub struct PendingAuth {
    pub flow: GrantFlow,
    pub state: String,
    pub code_verifier: Option<String>,
    pub result: Option<Result<Token, CallbackFailure>>,
}

/// Why the redirect back from the authorization server did not yield a token.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackFailure {
    Denied(String),
    StateMismatch { expected: String, received: String },
    Exchange(String),
    MissingToken,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
}

impl User {
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub collaborative: bool,
    pub owner: PlaylistOwner,
    pub tracks: PlaylistTracksRef,
    pub snapshot_id: String,
}

impl Playlist {
    pub fn is_editable_by(&self, user_id: &str) -> bool {
        self.owner.id == user_id || self.collaborative
    }
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub tracks: u64,
    pub owner: String,
    pub visibility: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub popularity: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub is_local: bool,
    #[serde(default)]
    pub artists: Vec<Artist>,
    pub album: Option<Album>,
}

impl Track {
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub added_at: Option<String>,
    pub track: Option<Track>,
}

/// Entry of the user's Liked Songs (`GET /me/tracks`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrack {
    pub added_at: Option<String>,
    pub track: Track,
}

/// Entry of the recently played history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayHistoryItem {
    pub played_at: String,
    pub track: Track,
}

/// Cursor paged answer of `GET /me/player/recently-played`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayHistory {
    pub items: Vec<PlayHistoryItem>,
    pub next: Option<String>,
}

/// Period the top items endpoints aggregate over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" | "short_term" | "4w" => Ok(TimeRange::ShortTerm),
            "medium" | "medium_term" | "6m" => Ok(TimeRange::MediumTerm),
            "long" | "long_term" | "all" => Ok(TimeRange::LongTerm),
            other => Err(format!("unknown time range '{}'", other)),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRange::ShortTerm => write!(f, "last 4 weeks"),
            TimeRange::MediumTerm => write!(f, "last 6 months"),
            TimeRange::LongTerm => write!(f, "all time"),
        }
    }
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub name: String,
    pub genres: String,
    pub popularity: String,
    pub id: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub title: String,
    pub artists: String,
    pub album: String,
    pub duration: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackUri {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<TrackUri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

/// Error body of the Web API: `{"error": {"status": 401, "message": "..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub message: String,
}

/// Where tracks are moved from: one of the user's playlists or Liked Songs.
#[derive(Debug, Clone)]
pub enum MoveSource {
    Liked,
    Playlist(Playlist),
}

impl MoveSource {
    pub fn name(&self) -> &str {
        match self {
            MoveSource::Liked => "Liked Songs",
            MoveSource::Playlist(playlist) => &playlist.name,
        }
    }
}

/// Outcome of moving tracks between two playlists.
///
/// `moved` tracks are added to the target and removed from the source.
/// `already_in_target` tracks are only removed from the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveReport {
    pub moved: Vec<String>,
    pub already_in_target: Vec<String>,
    pub missing: Vec<String>,
    pub skipped_local: Vec<String>,
}

impl MoveReport {
    /// Every uri that leaves the source playlist.
    pub fn removed(&self) -> Vec<String> {
        self.moved
            .iter()
            .chain(&self.already_in_target)
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.moved.is_empty() && self.already_in_target.is_empty()
    }
}

/// Which tracks of the source playlist to move.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackSelection {
    All,
    Uris(Vec<String>),
}
