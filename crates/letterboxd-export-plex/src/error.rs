use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlexError {
    #[error("request to Plex failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Plex rejected the access token")]
    Unauthorized,

    #[error("unexpected response from Plex ({status}) while {context}")]
    Status { status: StatusCode, context: String },

    #[error("unexpected response from Plex: {0}")]
    Unexpected(String),
}
