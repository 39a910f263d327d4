//! SQLite-backed genre lookup.
//!
//! By-genre recommendations go through a separate lookup collaborator rather
//! than the in-memory dataset scan: the dataset is mirrored into an in-memory
//! SQLite table at startup and genre queries run against it.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tracing::info;
use tunedeck_common::dataset::Dataset;
use tunedeck_common::song::{RawDuration, SongRecord};

/// In-memory genre index over the dataset.
pub struct GenreIndex {
    pool: SqlitePool,
}

impl GenreIndex {
    /// Mirror the dataset into a fresh in-memory SQLite table.
    pub async fn build(dataset: &Dataset) -> sqlx::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        sqlx::query(
            "CREATE TABLE songs (
                rowid_order INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                artist TEXT NOT NULL,
                genre TEXT NOT NULL,
                year INTEGER,
                duration INTEGER,
                popularity INTEGER
            )",
        )
        .execute(&pool)
        .await?;

        for song in dataset.songs() {
            sqlx::query(
                "INSERT INTO songs (title, artist, genre, year, duration, popularity)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&song.title)
            .bind(&song.artist)
            .bind(&song.genre)
            .bind(song.year)
            .bind(duration_column(song))
            .bind(song.popularity)
            .execute(&pool)
            .await?;
        }

        info!(rows = dataset.len(), "genre index built");
        Ok(Self { pool })
    }

    /// All songs with an exact case-insensitive genre match, in table order.
    pub async fn lookup(&self, genre: &str) -> sqlx::Result<Vec<SongRecord>> {
        let rows = sqlx::query(
            "SELECT title, artist, genre, year, duration, popularity
             FROM songs WHERE LOWER(genre) = LOWER(?) ORDER BY rowid_order",
        )
        .bind(genre)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SongRecord {
                title: row.get(0),
                artist: row.get(1),
                genre: row.get(2),
                year: row.get(3),
                duration: row.get::<Option<i64>, _>(4).map(RawDuration::Int),
                popularity: row.get(5),
            })
            .collect())
    }
}

/// Flatten a wire duration to the integer column, dropping text forms.
fn duration_column(song: &SongRecord) -> Option<i64> {
    match &song.duration {
        Some(RawDuration::Int(v)) => Some(*v),
        Some(RawDuration::Float(v)) => Some(*v as i64),
        _ => None,
    }
}
