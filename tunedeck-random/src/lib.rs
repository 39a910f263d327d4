//! tunedeck-random library - random-song endpoint dispatch.

use tunedeck_common::dataset::Dataset;
use tunedeck_common::endpoint::Dispatcher;
use tunedeck_common::envelope::{DecodedRequest, Request, Response};

/// Random-song service state: the dataset handle.
pub struct RandomSongService {
    dataset: Dataset,
}

impl RandomSongService {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

impl Dispatcher for RandomSongService {
    fn name(&self) -> &'static str {
        "random-song"
    }

    async fn dispatch(&self, request: DecodedRequest) -> Response {
        match request {
            DecodedRequest::Known(Request::RandomSong) => match self.dataset.sample_one() {
                Some(song) => Response::Song { song: song.clone() },
                None => Response::error("Dataset is empty"),
            },
            _ => Response::invalid_request_type(),
        }
    }
}
