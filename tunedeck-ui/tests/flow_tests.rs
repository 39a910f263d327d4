//! Scripted end-to-end runs of the menu screens.
//!
//! Input is a pre-baked script fed through the injected reader; no backend
//! service is contacted (the curation screens only touch the local stores).

use std::io::Cursor;
use std::path::Path;

use tempfile::TempDir;
use tunedeck_common::client::ServiceClient;
use tunedeck_common::dataset::Dataset;
use tunedeck_common::liked;
use tunedeck_common::song::{RawDuration, SongRecord};
use tunedeck_ui::screens::{ServiceEndpoints, Ui};
use tunedeck_ui::store::AccountStore;

fn script(lines: &[&str]) -> Cursor<Vec<u8>> {
    let mut text = lines.join("\n");
    text.push('\n');
    Cursor::new(text.into_bytes())
}

/// Clients pointed at a port nothing listens on; the scripts under test
/// never reach a service screen.
fn offline_services() -> ServiceEndpoints {
    let dead = ServiceClient::new("127.0.0.1:9");
    ServiceEndpoints {
        recommend: dead.clone(),
        random: dead.clone(),
        song_by_year: dead.clone(),
        total_duration: dead,
    }
}

fn sample_dataset() -> Dataset {
    Dataset::from_songs(vec![SongRecord {
        title: "My Song".into(),
        artist: "Me".into(),
        genre: "Rock".into(),
        year: Some(2001),
        duration: Some(RawDuration::Int(242_667)),
        popularity: Some(50),
    }])
}

async fn run_script(root: &Path, dataset: Option<Dataset>, lines: &[&str]) {
    let accounts = AccountStore::load(root).unwrap();
    let mut ui = Ui::new(
        script(lines),
        root.to_path_buf(),
        accounts,
        offline_services(),
        dataset,
    );
    ui.run().await.unwrap();
}

#[tokio::test]
async fn full_curation_session() {
    let root = TempDir::new().unwrap();
    run_script(
        root.path(),
        Some(sample_dataset()),
        &[
            "2", "ana", "secret123", // register
            "1", "ana", "secret123", // login
            "1", "My Song", "Me", "Y", // add a song, confirm
            "3", "my", "B", // lookup finds it, back
            "2", "1", "1", "b", // view Rock playlist, song details, back
            "4", "1", "Y", // delete it
            "L", "Y", // logout
            "Q", // quit from the welcome screen
        ],
    )
    .await;

    // The account survives the session; the collection is empty again.
    let accounts = AccountStore::load(root.path()).unwrap();
    assert!(accounts.verify("ana", "secret123"));
    assert!(liked::load_for_user(root.path(), "ana").unwrap().is_empty());
}

#[tokio::test]
async fn added_song_is_filled_in_from_the_dataset() {
    let root = TempDir::new().unwrap();
    run_script(
        root.path(),
        Some(sample_dataset()),
        &[
            "2", "ana", "secret123", "1", "ana", "secret123", // register + login
            "1", "my song", "me", "Y", // case-insensitive dataset match
            "Q", "Y", // quit from the home menu
        ],
    )
    .await;

    let songs = liked::load_for_user(root.path(), "ana").unwrap();
    assert_eq!(songs.len(), 1);
    let entry = &songs[0];
    assert_eq!(entry.song.title, "my song");
    assert_eq!(entry.song.genre, "Rock");
    assert_eq!(entry.song.year, Some(2001));
    assert_eq!(
        entry.song.duration,
        Some(RawDuration::Text("242667 ms".into()))
    );
    assert!(entry.date_added.is_some());
}

#[tokio::test]
async fn added_song_without_dataset_gets_unknown_details() {
    let root = TempDir::new().unwrap();
    run_script(
        root.path(),
        None,
        &[
            "2", "ana", "secret123", "1", "ana", "secret123", //
            "1", "Obscure Tune", "Nobody", "Y", //
            "Q", "Y",
        ],
    )
    .await;

    let songs = liked::load_for_user(root.path(), "ana").unwrap();
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0].song.genre, "Unknown");
    assert_eq!(songs[0].song.year, None);
    assert_eq!(songs[0].song.duration, None);
}

#[tokio::test]
async fn registration_and_login_reprompt_on_bad_input() {
    let root = TempDir::new().unwrap();
    run_script(
        root.path(),
        None,
        &[
            "2", "ana", "abc", // password too short, screen reprompts
            "ana", "secret123", // accepted
            "1", "ana", "wrong", // bad credentials, reprompt
            "b", // back to welcome
            "Q",
        ],
    )
    .await;

    let accounts = AccountStore::load(root.path()).unwrap();
    assert!(accounts.verify("ana", "secret123"));
    assert!(!accounts.verify("ana", "abc"));
}
