use letterboxd_export_models::Guid;

const IMDB_PREFIX: &str = "imdb://";
const TMDB_PREFIX: &str = "tmdb://";

/// The two identifiers Letterboxd can match on, pulled out of an item's
/// Guid array. Recomputed per item, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalIds {
    pub imdb: Option<String>,
    pub tmdb: Option<String>,
}

impl ExternalIds {
    /// Single pass over the references: strip the matching source prefix,
    /// later entries overwrite earlier ones, anything else is ignored.
    /// Absent values are an expected outcome, not an error.
    pub fn from_guids(guids: &[Guid]) -> Self {
        let mut ids = Self::default();
        for guid in guids {
            if let Some(rest) = guid.id.strip_prefix(IMDB_PREFIX) {
                ids.imdb = Some(rest.to_string());
            } else if let Some(rest) = guid.id.strip_prefix(TMDB_PREFIX) {
                ids.tmdb = Some(rest.to_string());
            }
        }
        ids
    }
}
