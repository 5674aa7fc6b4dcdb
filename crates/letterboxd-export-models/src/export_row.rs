use serde::Serialize;

/// Column order of the Letterboxd import schema. Written explicitly so an
/// export with zero rows still carries the header line.
pub const EXPORT_HEADER: [&str; 6] = [
    "Title",
    "Year",
    "imdbID",
    "tmdbID",
    "Rating10",
    "WatchedDate",
];

/// One data row of the Letterboxd import CSV. Absent fields serialize as
/// empty cells; Rating10 is a bare integer string when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: Option<u32>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "tmdbID")]
    pub tmdb_id: Option<String>,
    #[serde(rename = "Rating10")]
    pub rating10: Option<u8>,
    #[serde(rename = "WatchedDate")]
    pub watched_date: Option<String>,
}
