use async_trait::async_trait;
use chrono::{DateTime, Utc};
use letterboxd_export_models::WatchedMovie;

use crate::error::PlexError;

/// Query surface the export pipeline needs from a media library. The Plex
/// client is the production implementation; tests swap in an in-memory one.
#[async_trait]
pub trait MovieLibrary {
    /// Resolve a section name to its library key, or None if the library
    /// has no section by that name.
    async fn section_key(&self, name: &str) -> Result<Option<String>, PlexError>;

    /// Watched movies of a section, ascending by last-watched time. Items
    /// with no watch history are excluded; when `watched_after` is set only
    /// items watched strictly after the bound are returned.
    async fn watched_movies(
        &self,
        section_key: &str,
        watched_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<WatchedMovie>, PlexError>;
}
