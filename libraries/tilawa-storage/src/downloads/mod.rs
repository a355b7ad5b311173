//! Downloaded chapter recordings
//!
//! One row per `{reciter_id}_{chapter_number}` key. Payloads are stored as
//! blobs; listings only report their size.
//!
//! # Example
//!
//! ```rust,no_run
//! use tilawa_core::{Catalog, ReciterId, StoredTrack};
//! use tilawa_storage::downloads;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::builtin()?;
//! let chapter = catalog.chapter(36)?;
//! let track = StoredTrack::new(ReciterId::new("alafasy"), chapter, vec![0u8; 16]);
//!
//! downloads::put(pool, &track).await?;
//! let listing = downloads::list(pool).await?;
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tilawa_core::{DownloadedTrack, ReciterId, StoredTrack, TrackKey};

use crate::error::{Result, StorageError};

/// Save a recording, replacing an existing row with the same key
pub async fn put(pool: &SqlitePool, track: &StoredTrack) -> Result<()> {
    sqlx::query(
        "INSERT INTO downloads
            (track_key, reciter_id, chapter_number, chapter_name, payload, downloaded_at)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(track_key) DO UPDATE SET
            reciter_id = excluded.reciter_id,
            chapter_number = excluded.chapter_number,
            chapter_name = excluded.chapter_name,
            payload = excluded.payload,
            downloaded_at = excluded.downloaded_at",
    )
    .bind(track.key.as_str())
    .bind(track.reciter_id.as_str())
    .bind(i64::from(track.chapter_number))
    .bind(track.chapter_name.as_str())
    .bind(&track.payload[..])
    .bind(track.downloaded_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch a recording with its payload
///
/// Returns `Ok(None)` if no row exists for `key`.
pub async fn get(pool: &SqlitePool, key: &TrackKey) -> Result<Option<StoredTrack>> {
    let row = sqlx::query(
        "SELECT track_key, reciter_id, chapter_number, chapter_name, payload, downloaded_at
         FROM downloads
         WHERE track_key = ?",
    )
    .bind(key.as_str())
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let summary = summary_from_row(&row, None)?;
    let payload: Vec<u8> = row.try_get("payload")?;

    Ok(Some(StoredTrack {
        key: summary.key,
        reciter_id: summary.reciter_id,
        chapter_number: summary.chapter_number,
        chapter_name: summary.chapter_name,
        payload: Bytes::from(payload),
        downloaded_at: summary.downloaded_at,
    }))
}

/// Delete a recording
///
/// Returns `true` if a row was removed.
pub async fn delete(pool: &SqlitePool, key: &TrackKey) -> Result<bool> {
    let result = sqlx::query("DELETE FROM downloads WHERE track_key = ?")
        .bind(key.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List every recording, ordered by reciter then chapter
pub async fn list(pool: &SqlitePool) -> Result<Vec<DownloadedTrack>> {
    let rows = sqlx::query(
        "SELECT track_key, reciter_id, chapter_number, chapter_name,
                length(payload) AS size_bytes, downloaded_at
         FROM downloads
         ORDER BY reciter_id, chapter_number",
    )
    .fetch_all(pool)
    .await?;

    let mut tracks = Vec::with_capacity(rows.len());
    for row in &rows {
        let size: i64 = row.try_get("size_bytes")?;
        tracks.push(summary_from_row(row, Some(size))?);
    }
    Ok(tracks)
}

/// Number of stored recordings
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS total FROM downloads")
        .fetch_one(pool)
        .await?;
    Ok(row.try_get("total")?)
}

fn summary_from_row(row: &SqliteRow, size_bytes: Option<i64>) -> Result<DownloadedTrack> {
    let key: String = row.try_get("track_key")?;
    let chapter_number: i64 = row.try_get("chapter_number")?;
    let chapter_number = u16::try_from(chapter_number)
        .map_err(|_| StorageError::corrupt(&key, format!("chapter {}", chapter_number)))?;

    let size_bytes = match size_bytes {
        Some(size) => u64::try_from(size)
            .map_err(|_| StorageError::corrupt(&key, format!("size {}", size)))?,
        None => 0,
    };

    Ok(DownloadedTrack {
        reciter_id: ReciterId::new(row.try_get::<String, _>("reciter_id")?),
        chapter_name: row.try_get("chapter_name")?,
        downloaded_at: row.try_get("downloaded_at")?,
        chapter_number,
        size_bytes,
        key: TrackKey::from_raw(key),
    })
}
