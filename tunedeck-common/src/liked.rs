//! Per-user liked-song store.
//!
//! An ordered JSON array at `<root>/liked_songs/<username>.json`. The UI owns
//! writes; the total-duration service only reads. Single writer per user is
//! assumed, not enforced here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::song::SongRecord;
use crate::{Error, Result};

/// One liked-song entry: a song plus curation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikedSong {
    #[serde(flatten)]
    pub song: SongRecord,
    /// Date the entry was added, `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
}

/// Path of one user's collection file.
pub fn liked_songs_path(root: &Path, username: &str) -> PathBuf {
    root.join("liked_songs").join(format!("{username}.json"))
}

/// Read a collection as raw JSON values.
///
/// The duration aggregator tolerates entries that are not record-shaped, so
/// this read stays untyped. A file that is not a JSON array is an error.
pub fn read_raw(path: &Path) -> Result<Vec<Value>> {
    let text = std::fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&text)? {
        Value::Array(items) => Ok(items),
        _ => Err(Error::InvalidInput(
            "malformed liked songs file (expected a list)".into(),
        )),
    }
}

/// Typed load for the UI; a missing file is an empty collection.
pub fn load_for_user(root: &Path, username: &str) -> Result<Vec<LikedSong>> {
    let path = liked_songs_path(root, username);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Persist a user's collection, creating the store directory on first save.
pub fn save_for_user(root: &Path, username: &str, songs: &[LikedSong]) -> Result<()> {
    let path = liked_songs_path(root, username);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, serde_json::to_string_pretty(songs)?)?;
    Ok(())
}
