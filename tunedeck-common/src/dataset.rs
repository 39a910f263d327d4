//! CSV dataset loading and row selection.
//!
//! The dataset is loaded once at process startup into an immutable handle and
//! injected into the service that needs it; nothing mutates it afterwards, so
//! no locking is required. A required column missing from the header is the
//! one fatal startup condition in the whole system.

use std::path::Path;

use rand::seq::SliceRandom;
use tracing::info;

use crate::song::{RawDuration, SongRecord};
use crate::{Error, Result};

/// First-match column aliases, most specific name first.
const TITLE_COLUMNS: &[&str] = &["track_name", "title", "name"];
const ARTIST_COLUMNS: &[&str] = &["artist_name", "artist"];
const GENRE_COLUMNS: &[&str] = &["genre"];
const YEAR_COLUMNS: &[&str] = &["year", "release_year"];
const DURATION_COLUMNS: &[&str] = &["duration", "duration_ms"];
const POPULARITY_COLUMNS: &[&str] = &["popularity"];

/// Immutable in-memory dataset handle.
#[derive(Debug, Clone)]
pub struct Dataset {
    songs: Vec<SongRecord>,
}

impl Dataset {
    /// Build from rows already in memory (tests, synthetic datasets).
    pub fn from_songs(songs: Vec<SongRecord>) -> Self {
        Self { songs }
    }

    /// Load a CSV dataset, resolving column aliases from the header.
    ///
    /// Rows with an empty title, artist, or genre are dropped. `year`,
    /// `duration`, and `popularity` cells are coerced to integers; a cell
    /// that does not coerce becomes `None`.
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| Error::Dataset(format!("cannot open {}: {e}", path.display())))?;
        let headers = reader
            .headers()
            .map_err(|e| Error::Dataset(format!("cannot read CSV header: {e}")))?
            .clone();
        let columns = ColumnMap::resolve(&headers)?;

        let mut songs = Vec::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| Error::Dataset(format!("unreadable CSV record: {e}")))?;
            if let Some(song) = columns.song_from(&record) {
                songs.push(song);
            }
        }
        info!(rows = songs.len(), path = %path.display(), "dataset loaded");
        Ok(Self { songs })
    }

    pub fn songs(&self) -> &[SongRecord] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// All songs by exact case-insensitive artist match, in dataset order.
    pub fn by_artist(&self, artist: &str) -> Vec<&SongRecord> {
        let needle = artist.to_lowercase();
        self.songs
            .iter()
            .filter(|s| s.artist.to_lowercase() == needle)
            .collect()
    }

    /// All songs ranked by descending popularity.
    ///
    /// Rows without a popularity value are excluded; ties keep dataset row
    /// order (stable sort).
    pub fn ranked_by_popularity(&self) -> Vec<&SongRecord> {
        let mut ranked: Vec<&SongRecord> = self
            .songs
            .iter()
            .filter(|s| s.popularity.is_some())
            .collect();
        ranked.sort_by_key(|s| std::cmp::Reverse(s.popularity.unwrap_or(i64::MIN)));
        ranked
    }

    /// All songs with exact year equality, in dataset order.
    pub fn by_year(&self, year: i64) -> Vec<&SongRecord> {
        self.songs.iter().filter(|s| s.year == Some(year)).collect()
    }

    /// One uniformly random row, `None` when the dataset is empty.
    ///
    /// Independent across requests: no repetition avoidance, no session
    /// state.
    pub fn sample_one(&self) -> Option<&SongRecord> {
        self.songs.choose(&mut rand::thread_rng())
    }

    /// One uniformly random row among songs from `year`.
    pub fn sample_by_year(&self, year: i64) -> Option<&SongRecord> {
        self.by_year(year).choose(&mut rand::thread_rng()).copied()
    }

    /// Exact case-insensitive title+artist lookup, first match wins.
    pub fn find_song(&self, title: &str, artist: &str) -> Option<&SongRecord> {
        let title = title.to_lowercase();
        let artist = artist.to_lowercase();
        self.songs
            .iter()
            .find(|s| s.title.to_lowercase() == title && s.artist.to_lowercase() == artist)
    }
}

/// Header indices resolved through the alias lists.
struct ColumnMap {
    title: usize,
    artist: usize,
    genre: usize,
    year: Option<usize>,
    duration: Option<usize>,
    popularity: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |aliases: &[&str]| {
            headers
                .iter()
                .position(|h| aliases.iter().any(|a| h.trim() == *a))
        };
        let required = |aliases: &[&str]| {
            find(aliases).ok_or_else(|| {
                Error::Dataset(format!(
                    "dataset is missing a required column (one of {aliases:?})"
                ))
            })
        };
        Ok(Self {
            title: required(TITLE_COLUMNS)?,
            artist: required(ARTIST_COLUMNS)?,
            genre: required(GENRE_COLUMNS)?,
            year: find(YEAR_COLUMNS),
            duration: find(DURATION_COLUMNS),
            popularity: find(POPULARITY_COLUMNS),
        })
    }

    fn song_from(&self, record: &csv::StringRecord) -> Option<SongRecord> {
        let text = |idx: usize| {
            record
                .get(idx)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        Some(SongRecord {
            title: text(self.title)?,
            artist: text(self.artist)?,
            genre: text(self.genre)?,
            year: self.year.and_then(|idx| int_cell(record, idx)),
            duration: self
                .duration
                .and_then(|idx| int_cell(record, idx))
                .map(RawDuration::Int),
            popularity: self.popularity.and_then(|idx| int_cell(record, idx)),
        })
    }
}

/// Coerce a cell to an integer, tolerating float-formatted values.
fn int_cell(record: &csv::StringRecord, idx: usize) -> Option<i64> {
    let cell = record.get(idx)?.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<i64>()
        .ok()
        .or_else(|| cell.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
}
