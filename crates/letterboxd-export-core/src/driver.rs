use std::io;

use chrono::{DateTime, Utc};
use letterboxd_export_models::EXPORT_HEADER;
use letterboxd_export_plex::MovieLibrary;
use tracing::{debug, info};

use crate::error::ExportError;
use crate::mapper::map_row;

/// A finished export: the complete CSV document (header included) and the
/// number of data rows in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub csv: String,
    pub rows: usize,
}

/// Run one export against an already-resolved session. Section names are
/// resolved up front so an unknown name fails before any row is written.
/// Rows are accumulated in query order, sections in argument order, with
/// no deduplication across sections; any failure discards the export.
pub async fn export_watched<L: MovieLibrary + ?Sized>(
    library: &L,
    sections: &[String],
    watched_after: Option<DateTime<Utc>>,
) -> Result<ExportOutcome, ExportError> {
    let mut resolved = Vec::with_capacity(sections.len());
    for name in sections {
        let key = library
            .section_key(name)
            .await?
            .ok_or_else(|| ExportError::SectionNotFound(name.clone()))?;
        resolved.push((name.as_str(), key));
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    let mut rows = 0;
    for (name, key) in &resolved {
        let movies = library.watched_movies(key, watched_after).await?;
        debug!(section = %name, count = movies.len(), "mapping watched movies");
        for movie in &movies {
            writer.serialize(map_row(movie))?;
            rows += 1;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))?;
    let csv = String::from_utf8(bytes).map_err(|e| {
        ExportError::Csv(csv::Error::from(io::Error::new(
            io::ErrorKind::InvalidData,
            e,
        )))
    })?;

    info!(rows, "export finished");
    Ok(ExportOutcome { csv, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use letterboxd_export_models::{Guid, WatchedMovie};
    use letterboxd_export_plex::PlexError;
    use std::collections::HashMap;

    struct FakeLibrary {
        // section name -> key
        sections: HashMap<String, String>,
        // key -> every movie in the section, watched or not
        movies: HashMap<String, Vec<WatchedMovie>>,
    }

    #[async_trait]
    impl MovieLibrary for FakeLibrary {
        async fn section_key(&self, name: &str) -> Result<Option<String>, PlexError> {
            Ok(self.sections.get(name).cloned())
        }

        async fn watched_movies(
            &self,
            section_key: &str,
            watched_after: Option<DateTime<Utc>>,
        ) -> Result<Vec<WatchedMovie>, PlexError> {
            let mut movies: Vec<WatchedMovie> = self
                .movies
                .get(section_key)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .filter(|movie| match (movie.last_viewed_at, watched_after) {
                    (None, _) => false,
                    (Some(watched), Some(bound)) => watched > bound,
                    (Some(_), None) => true,
                })
                .collect();
            movies.sort_by_key(|movie| movie.last_viewed_at);
            Ok(movies)
        }
    }

    fn watched(title: &str, day: u32, rating: Option<f64>) -> WatchedMovie {
        WatchedMovie {
            rating_key: title.to_string(),
            title: title.to_string(),
            year: Some(2020),
            user_rating: rating,
            last_viewed_at: Utc.with_ymd_and_hms(2023, 6, day, 12, 0, 0).single(),
            guids: vec![Guid {
                id: format!("imdb://tt{}", day),
            }],
        }
    }

    fn unwatched(title: &str) -> WatchedMovie {
        WatchedMovie {
            rating_key: title.to_string(),
            title: title.to_string(),
            year: Some(2020),
            user_rating: None,
            last_viewed_at: None,
            guids: Vec::new(),
        }
    }

    fn library(movies: Vec<WatchedMovie>) -> FakeLibrary {
        FakeLibrary {
            sections: HashMap::from([("Movies".to_string(), "1".to_string())]),
            movies: HashMap::from([("1".to_string(), movies)]),
        }
    }

    #[tokio::test]
    async fn test_export_skips_unwatched_and_orders_ascending() {
        let lib = library(vec![
            watched("Second", 20, Some(8.6)),
            unwatched("Never Seen"),
            watched("First", 10, None),
        ]);

        let outcome = export_watched(&lib, &["Movies".to_string()], None)
            .await
            .unwrap();

        assert_eq!(outcome.rows, 2);
        let lines: Vec<&str> = outcome.csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Title,Year,imdbID,tmdbID,Rating10,WatchedDate");
        assert_eq!(lines[1], "First,2020,tt10,,,2023-06-10");
        assert_eq!(lines[2], "Second,2020,tt20,,9,2023-06-20");
    }

    #[tokio::test]
    async fn test_empty_section_still_has_header() {
        let lib = library(Vec::new());

        let outcome = export_watched(&lib, &["Movies".to_string()], None)
            .await
            .unwrap();

        assert_eq!(outcome.rows, 0);
        assert_eq!(outcome.csv, "Title,Year,imdbID,tmdbID,Rating10,WatchedDate\n");
    }

    #[tokio::test]
    async fn test_unknown_section_aborts_export() {
        let lib = library(vec![watched("Kept", 10, None)]);

        let err = export_watched(
            &lib,
            &["Movies".to_string(), "Anime".to_string()],
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ExportError::SectionNotFound(name) if name == "Anime"));
    }

    #[tokio::test]
    async fn test_watched_after_bound_is_strict() {
        let lib = library(vec![
            watched("On The Bound", 15, None),
            watched("After", 16, None),
            watched("Before", 14, None),
        ]);
        let bound = Utc.with_ymd_and_hms(2023, 6, 15, 12, 0, 0).single();

        let outcome = export_watched(&lib, &["Movies".to_string()], bound)
            .await
            .unwrap();

        assert_eq!(outcome.rows, 1);
        assert!(outcome.csv.contains("After"));
        assert!(!outcome.csv.contains("Before"));
        assert!(!outcome.csv.contains("On The Bound"));
    }

    #[tokio::test]
    async fn test_sections_appended_in_order_without_dedup() {
        let shared_movie = watched("Everywhere", 12, Some(7.0));
        let lib = FakeLibrary {
            sections: HashMap::from([
                ("Movies".to_string(), "1".to_string()),
                ("Classics".to_string(), "2".to_string()),
            ]),
            movies: HashMap::from([
                (
                    "1".to_string(),
                    vec![shared_movie.clone(), watched("Only Here", 25, None)],
                ),
                ("2".to_string(), vec![shared_movie]),
            ]),
        };

        let outcome = export_watched(
            &lib,
            &["Movies".to_string(), "Classics".to_string()],
            None,
        )
        .await
        .unwrap();

        assert_eq!(outcome.rows, 3);
        let lines: Vec<&str> = outcome.csv.lines().collect();
        // Section order wins over timestamps across sections.
        assert!(lines[1].starts_with("Everywhere,"));
        assert!(lines[2].starts_with("Only Here,"));
        assert!(lines[3].starts_with("Everywhere,"));
    }

    #[tokio::test]
    async fn test_export_is_idempotent() {
        let lib = library(vec![
            watched("A", 10, Some(6.5)),
            watched("B", 11, Some(9.9)),
        ]);

        let first = export_watched(&lib, &["Movies".to_string()], None)
            .await
            .unwrap();
        let second = export_watched(&lib, &["Movies".to_string()], None)
            .await
            .unwrap();

        assert_eq!(first, second);
    }
}
