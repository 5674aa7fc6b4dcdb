use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One external-reference entry from a library item's Guid array,
/// e.g. "imdb://tt0111161" or "tmdb://278".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guid {
    pub id: String,
}

/// Read-only snapshot of a library movie as returned by a section query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedMovie {
    pub rating_key: String,
    pub title: String,
    pub year: Option<u32>,
    pub user_rating: Option<f64>,
    pub last_viewed_at: Option<DateTime<Utc>>,
    pub guids: Vec<Guid>,
}
