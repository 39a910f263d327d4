//! tunedeck-year library - song-by-year endpoint dispatch.

use tunedeck_common::dataset::Dataset;
use tunedeck_common::endpoint::Dispatcher;
use tunedeck_common::envelope::{coerce_year, DecodedRequest, Request, Response};

/// Song-by-year service state: the dataset handle.
pub struct SongByYearService {
    dataset: Dataset,
}

impl SongByYearService {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

impl Dispatcher for SongByYearService {
    fn name(&self) -> &'static str {
        "song-by-year"
    }

    async fn dispatch(&self, request: DecodedRequest) -> Response {
        match request {
            DecodedRequest::Known(Request::GetSongByYear { year }) => {
                // An uncoercible year is a dispatch error, not a crash.
                let Some(year) = coerce_year(&year) else {
                    return Response::error("Invalid 'year' value");
                };
                // Empty subset yields an empty list, not an error.
                let songs = self
                    .dataset
                    .sample_by_year(year)
                    .into_iter()
                    .cloned()
                    .collect();
                Response::Songs { songs }
            }
            _ => Response::invalid_request_type(),
        }
    }
}
