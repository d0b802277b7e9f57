use serde::Serialize;

use crate::entities::movie;

pub const DEFAULT_RATING: f64 = 0.0;
pub const DEFAULT_REVIEW: &str = "No review yet.";
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// A movie paired with its 1-based position in the rating order.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedMovie {
    pub ranking: usize,
    pub movie: movie::Model,
}

/// Orders by descending rating and numbers the result from 1. The sort is stable, so
/// equal ratings keep their input order.
pub fn rank(mut movies: Vec<movie::Model>) -> Vec<RankedMovie> {
    movies.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    movies
        .into_iter()
        .enumerate()
        .map(|(i, movie)| RankedMovie { ranking: i + 1, movie })
        .collect()
}

/// One candidate from a provider title search.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchResult {
    pub original_title: String,
    pub release_date: String,
    pub external_id: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MovieDetails {
    pub title: String,
    pub poster_path: String,
    pub release_year: i32,
    pub overview: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub rating: f64,
    pub review: String,
    pub img_url: String,
}

impl NewMovie {
    /// Builds a list entry with placeholder rating and review; the user is sent to the
    /// edit form right after creation to replace them.
    pub fn from_details(details: MovieDetails, image_base_url: &str) -> Self {
        let img_url = format!(
            "{}/{}",
            image_base_url.trim_end_matches('/'),
            details.poster_path.trim_start_matches('/')
        );
        Self {
            title: details.title,
            year: details.release_year,
            description: details.overview.chars().take(MAX_DESCRIPTION_CHARS).collect(),
            rating: DEFAULT_RATING,
            review: DEFAULT_REVIEW.to_string(),
            img_url,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_movie(id: i32, title: &str, rating: f64) -> movie::Model {
    movie::Model {
        id,
        title: title.to_string(),
        year: 2000,
        description: String::new(),
        rating,
        ranking: 0.0,
        review: String::new(),
        img_url: format!("https://img.test/{id}.jpg"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_orders_by_rating_and_numbers_from_one() {
        let ranked = rank(vec![
            sample_movie(1, "Seven", 7.0),
            sample_movie(2, "Nine", 9.0),
            sample_movie(3, "Eight", 8.0),
        ]);

        let order: Vec<_> = ranked.iter().map(|r| (r.ranking, r.movie.id)).collect();
        assert_eq!(order, vec![(1, 2), (2, 3), (3, 1)]);
    }

    #[test]
    fn rank_keeps_input_order_for_ties_and_leaves_entries_untouched() {
        let input = vec![sample_movie(5, "A", 6.5), sample_movie(3, "B", 6.5)];
        let ranked = rank(input.clone());

        assert_eq!(ranked[0].movie, input[0]);
        assert_eq!(ranked[1].movie, input[1]);
        assert!(ranked.iter().all(|r| r.movie.ranking == 0.0));
    }

    #[test]
    fn rank_of_nothing_is_empty() {
        assert!(rank(Vec::new()).is_empty());
    }

    #[test]
    fn new_movie_joins_poster_and_truncates_description() {
        let details = MovieDetails {
            title: "Inception".to_string(),
            poster_path: "/poster.jpg".to_string(),
            release_year: 2010,
            overview: "x".repeat(MAX_DESCRIPTION_CHARS + 20),
        };

        let movie = NewMovie::from_details(details, "https://image.tmdb.org/t/p/w500/");

        assert_eq!(movie.img_url, "https://image.tmdb.org/t/p/w500/poster.jpg");
        assert_eq!(movie.description.chars().count(), MAX_DESCRIPTION_CHARS);
        assert_eq!(movie.rating, DEFAULT_RATING);
        assert_eq!(movie.review, DEFAULT_REVIEW);
    }
}
