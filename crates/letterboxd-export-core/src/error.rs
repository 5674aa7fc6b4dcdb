use letterboxd_export_plex::PlexError;
use thiserror::Error;

/// Failure taxonomy of one export operation. Any of these aborts the whole
/// export; no partial result is ever returned as a success.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("library section not found: {0}")]
    SectionNotFound(String),

    #[error(transparent)]
    Remote(#[from] PlexError),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}
