//! tunedeck-recommend library - recommendation endpoint dispatch.
//!
//! Serves three operations: songs by the same artist (dataset scan), songs
//! in the same genre (SQLite index lookup), and the overall most popular
//! songs. Results exclude titles the requester already has, then cut to
//! [`RECOMMENDATION_LIMIT`].

use tracing::warn;
use tunedeck_common::dataset::Dataset;
use tunedeck_common::endpoint::Dispatcher;
use tunedeck_common::envelope::{DecodedRequest, Request, Response};
use tunedeck_common::song::SongRecord;

pub mod genre_index;

use genre_index::GenreIndex;

/// Maximum number of songs in one recommendation response.
pub const RECOMMENDATION_LIMIT: usize = 5;

/// Recommendation service state: the dataset handle plus the genre index.
pub struct RecommendService {
    dataset: Dataset,
    genres: GenreIndex,
}

impl RecommendService {
    pub fn new(dataset: Dataset, genres: GenreIndex) -> Self {
        Self { dataset, genres }
    }

    /// Up to five songs by exact case-insensitive artist match, dataset order.
    fn by_artist(&self, artist: &str, exclude_titles: &[String]) -> Vec<SongRecord> {
        cut(
            self.dataset.by_artist(artist).into_iter().cloned(),
            exclude_titles,
        )
    }

    /// Top five by descending popularity, ties in dataset order.
    fn popular(&self, exclude_titles: &[String]) -> Vec<SongRecord> {
        cut(
            self.dataset.ranked_by_popularity().into_iter().cloned(),
            exclude_titles,
        )
    }

    async fn by_genre(&self, genre: &str, exclude_titles: &[String]) -> Response {
        match self.genres.lookup(genre).await {
            Ok(songs) => Response::Recommendations {
                recommendations: cut(songs.into_iter(), exclude_titles),
            },
            Err(e) => {
                warn!(error = %e, "genre lookup failed");
                Response::error(format!("Genre lookup failed: {e}"))
            }
        }
    }
}

/// Drop excluded titles (case-insensitive), then apply the result cut.
fn cut(
    songs: impl Iterator<Item = SongRecord>,
    exclude_titles: &[String],
) -> Vec<SongRecord> {
    let excluded: Vec<String> = exclude_titles.iter().map(|t| t.to_lowercase()).collect();
    songs
        .filter(|s| !excluded.contains(&s.title.to_lowercase()))
        .take(RECOMMENDATION_LIMIT)
        .collect()
}

impl Dispatcher for RecommendService {
    fn name(&self) -> &'static str {
        "recommend"
    }

    async fn dispatch(&self, request: DecodedRequest) -> Response {
        let DecodedRequest::Known(request) = request else {
            return Response::invalid_request_type();
        };
        match request {
            Request::RecommendByArtist {
                artist,
                exclude_titles,
                ..
            } => Response::Recommendations {
                recommendations: self.by_artist(&artist, &exclude_titles),
            },
            Request::RecommendByGenre {
                genre,
                exclude_titles,
                ..
            } => self.by_genre(&genre, &exclude_titles).await,
            Request::RecommendPopular { exclude_titles, .. } => Response::Recommendations {
                recommendations: self.popular(&exclude_titles),
            },
            _ => Response::invalid_request_type(),
        }
    }
}
