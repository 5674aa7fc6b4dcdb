use letterboxd_export_models::{ExportRow, WatchedMovie};

use crate::ids::ExternalIds;

/// Map one watched movie to one Letterboxd row. Title and year are copied
/// verbatim, IDs come from the Guid array, the 0-10 rating is rounded
/// half-up to a bare integer, the watched date is formatted `YYYY-MM-DD`.
pub fn map_row(movie: &WatchedMovie) -> ExportRow {
    let ids = ExternalIds::from_guids(&movie.guids);

    ExportRow {
        title: movie.title.clone(),
        year: movie.year,
        imdb_id: ids.imdb,
        tmdb_id: ids.tmdb,
        rating10: movie.user_rating.map(round_rating),
        watched_date: movie
            .last_viewed_at
            .map(|watched| watched.format("%Y-%m-%d").to_string()),
    }
}

// Half-up at .5 boundaries; f64::round rounds halves away from zero and
// ratings are never negative.
fn round_rating(rating: f64) -> u8 {
    rating.round().clamp(0.0, 10.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use letterboxd_export_models::Guid;

    fn movie() -> WatchedMovie {
        WatchedMovie {
            rating_key: "101".to_string(),
            title: "The Shawshank Redemption".to_string(),
            year: Some(1994),
            user_rating: Some(8.6),
            last_viewed_at: Utc.with_ymd_and_hms(2023, 5, 14, 10, 0, 0).single(),
            guids: vec![
                Guid {
                    id: "imdb://tt0111161".to_string(),
                },
                Guid {
                    id: "tmdb://278".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_maps_all_fields() {
        let row = map_row(&movie());
        assert_eq!(row.title, "The Shawshank Redemption");
        assert_eq!(row.year, Some(1994));
        assert_eq!(row.imdb_id.as_deref(), Some("tt0111161"));
        assert_eq!(row.tmdb_id.as_deref(), Some("278"));
        assert_eq!(row.rating10, Some(9));
        assert_eq!(row.watched_date.as_deref(), Some("2023-05-14"));
    }

    #[test]
    fn test_rating_rounds_to_nearest_integer() {
        let mut m = movie();
        m.user_rating = Some(8.6);
        assert_eq!(map_row(&m).rating10, Some(9));

        m.user_rating = Some(7.0);
        assert_eq!(map_row(&m).rating10, Some(7));

        m.user_rating = Some(8.4);
        assert_eq!(map_row(&m).rating10, Some(8));
    }

    #[test]
    fn test_rating_half_rounds_up() {
        let mut m = movie();
        m.user_rating = Some(8.5);
        assert_eq!(map_row(&m).rating10, Some(9));
    }

    #[test]
    fn test_absent_rating_stays_absent() {
        let mut m = movie();
        m.user_rating = None;
        assert_eq!(map_row(&m).rating10, None);
    }

    #[test]
    fn test_absent_watched_date_stays_absent() {
        let mut m = movie();
        m.last_viewed_at = None;
        assert_eq!(map_row(&m).watched_date, None);
    }

    #[test]
    fn test_absent_year_is_valid() {
        let mut m = movie();
        m.year = None;
        m.guids.clear();
        let row = map_row(&m);
        assert_eq!(row.year, None);
        assert_eq!(row.imdb_id, None);
        assert_eq!(row.tmdb_id, None);
    }
}
