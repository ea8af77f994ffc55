//! # Spotify Integration Module
//!
//! Thin wrappers around the Spotify Web API and the accounts service.
//!
//! ```text
//! CLI layer
//!     ↓
//! Spotify integration
//!     ├── auth       authorize, code exchange, refresh
//!     ├── client     bearer requests, refresh-and-retry, paging
//!     ├── profile    GET /me
//!     ├── playlists  list, get, create, resolve references
//!     ├── library    Liked Songs
//!     ├── insights   top tracks and artists, recently played
//!     └── tracks     playlist tracks, add, remove, move
//!     ↓
//! reqwest / JSON
//! ```
//!
//! ## Token lifecycle
//!
//! `auth` stores the token obtained by either grant. [`client::SpotifyClient`]
//! checks its expiry before each call and refreshes it silently; a `401`
//! answer causes one refresh and a single retry. Refreshes go through the
//! token mutex so several failing calls refresh only once.
//!
//! ## Endpoints
//!
//! - `POST /api/token` - code exchange and refresh
//! - `GET /me` - profile
//! - `GET /me/playlists` - playlists, paged
//! - `GET /playlists/{id}` - single playlist
//! - `GET /playlists/{id}/tracks` - playlist items, paged
//! - `POST /playlists/{id}/tracks` - add tracks
//! - `DELETE /playlists/{id}/tracks` - remove tracks
//! - `POST /users/{id}/playlists` - create a playlist
//! - `GET /me/tracks`, `DELETE /me/tracks` - Liked Songs
//! - `GET /me/top/{tracks,artists}` - top items
//! - `GET /me/player/recently-played` - listening history

pub mod auth;
pub mod client;
pub mod insights;
pub mod library;
pub mod playlists;
pub mod profile;
pub mod tracks;

pub use client::SpotifyClient;
