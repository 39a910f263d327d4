//! Dispatch tests for the random-song service.

use tunedeck_common::dataset::Dataset;
use tunedeck_common::endpoint::Dispatcher;
use tunedeck_common::envelope::{DecodedRequest, Request, Response};
use tunedeck_common::song::SongRecord;
use tunedeck_random::RandomSongService;

fn song(title: &str) -> SongRecord {
    SongRecord {
        title: title.into(),
        artist: "Someone".into(),
        genre: "Pop".into(),
        year: Some(2020),
        duration: None,
        popularity: None,
    }
}

#[tokio::test]
async fn returns_a_row_from_the_dataset() {
    let service = RandomSongService::new(Dataset::from_songs(vec![song("Only Song")]));
    let response = service
        .dispatch(DecodedRequest::Known(Request::RandomSong))
        .await;
    let Response::Song { song } = response else {
        panic!("expected a song, got {response:?}");
    };
    assert_eq!(song.title, "Only Song");
}

#[tokio::test]
async fn every_sample_is_independent() {
    let dataset = Dataset::from_songs(vec![song("A"), song("B"), song("C")]);
    let service = RandomSongService::new(dataset);
    // No session state: repeated requests keep working and always hit a row.
    for _ in 0..20 {
        let response = service
            .dispatch(DecodedRequest::Known(Request::RandomSong))
            .await;
        assert!(matches!(response, Response::Song { .. }));
    }
}

#[tokio::test]
async fn empty_dataset_is_an_error_envelope() {
    let service = RandomSongService::new(Dataset::from_songs(vec![]));
    let response = service
        .dispatch(DecodedRequest::Known(Request::RandomSong))
        .await;
    assert_eq!(response, Response::error("Dataset is empty"));
}

#[tokio::test]
async fn other_request_types_are_invalid_here() {
    let service = RandomSongService::new(Dataset::from_songs(vec![song("A")]));
    let response = service
        .dispatch(DecodedRequest::Known(Request::GetTotalDuration {
            username: "ana".into(),
        }))
        .await;
    assert_eq!(response, Response::invalid_request_type());
}
