use std::fs;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};
use tracing::debug;

use crate::library::Track;
use crate::metadata::Field;
use crate::sync::SyncTime;

use super::store::{CatalogStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tracks (
    id INTEGER PRIMARY KEY,
    path TEXT NOT NULL UNIQUE,
    mime TEXT,
    last_sync_time INTEGER,
    has_cover INTEGER NOT NULL DEFAULT 0,
    "title" TEXT,
    "artist" TEXT,
    "album" TEXT,
    "modified_by" TEXT,
    "grouping" TEXT,
    "copyright" TEXT,
    "publisher" TEXT,
    "composer" TEXT,
    "track" TEXT,
    "set" TEXT,
    "bpm" TEXT,
    "year" TEXT,
    "genre" TEXT,
    "codec" TEXT,
    "encoded_by" TEXT
);
CREATE INDEX IF NOT EXISTS tracks_last_sync_time ON tracks (last_sync_time);
"#;

/// Leading columns, followed by one column per `Field::ALL` entry.
const FIXED_COLUMNS: [&str; 4] = ["path", "mime", "last_sync_time", "has_cover"];

fn column_list() -> String {
    FIXED_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(Field::ALL.iter().map(|f| format!("\"{}\"", f.name())))
        .collect::<Vec<_>>()
        .join(", ")
}

fn upsert_sql() -> String {
    let count = FIXED_COLUMNS.len() + Field::ALL.len();
    let placeholders = (1..=count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let updates = FIXED_COLUMNS[1..]
        .iter()
        .map(|c| c.to_string())
        .chain(Field::ALL.iter().map(|f| format!("\"{}\"", f.name())))
        .map(|c| format!("{c} = excluded.{c}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO tracks ({}) VALUES ({placeholders}) ON CONFLICT(path) DO UPDATE SET {updates}",
        column_list()
    )
}

fn row_to_track(row: &Row<'_>) -> rusqlite::Result<Track> {
    let mut track = Track::new(row.get::<_, String>(0)?);
    track.mime = row.get(1)?;
    track.last_sync_time = row.get::<_, Option<i64>>(2)?.map(SyncTime::from_nanos);
    track.has_cover = row.get(3)?;
    for (i, field) in Field::ALL.into_iter().enumerate() {
        *track.field_mut(field) = row.get(FIXED_COLUMNS.len() + i)?;
    }
    Ok(track)
}

/// Catalog stored in a single SQLite table.
///
/// The first write after a commit opens a transaction; `commit` and
/// `rollback` close it. Dropping the catalog with a transaction open rolls
/// it back.
pub struct SqliteCatalog {
    conn: Connection,
    select_sql: String,
    upsert_sql: String,
}

impl SqliteCatalog {
    /// Open (or create) the catalog at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        debug!(path = %path.display(), "opened catalog");
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            select_sql: format!("SELECT {} FROM tracks", column_list()),
            upsert_sql: upsert_sql(),
        })
    }

    fn begin(&self) -> Result<(), StoreError> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN IMMEDIATE")?;
        }
        Ok(())
    }
}

impl CatalogStore for SqliteCatalog {
    fn find_by_path(&self, key: &str) -> Result<Option<Track>, StoreError> {
        let sql = format!("{} WHERE path = ?1", self.select_sql);
        let mut stmt = self.conn.prepare_cached(&sql)?;
        Ok(stmt.query_row(params![key], row_to_track).optional()?)
    }

    fn upsert(&mut self, track: &Track) -> Result<(), StoreError> {
        self.begin()?;

        let mime = track.mime.as_deref();
        let synced = track.last_sync_time.map(SyncTime::as_nanos);
        let fields: Vec<Option<&str>> = Field::ALL.iter().map(|f| track.field(*f)).collect();

        let mut values: Vec<&dyn ToSql> = Vec::with_capacity(FIXED_COLUMNS.len() + fields.len());
        values.push(&track.path);
        values.push(&mime);
        values.push(&synced);
        values.push(&track.has_cover);
        values.extend(fields.iter().map(|v| v as &dyn ToSql));

        let mut stmt = self.conn.prepare_cached(&self.upsert_sql)?;
        stmt.execute(values.as_slice())?;
        Ok(())
    }

    fn delete_stale(&mut self, run: SyncTime) -> Result<usize, StoreError> {
        self.begin()?;
        let deleted = self.conn.execute(
            "DELETE FROM tracks WHERE last_sync_time IS NULL OR last_sync_time <> ?1",
            params![run.as_nanos()],
        )?;
        Ok(deleted)
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StoreError> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
    }

    fn latest_sync_time(&self) -> Result<Option<SyncTime>, StoreError> {
        let latest: Option<i64> =
            self.conn
                .query_row("SELECT MAX(last_sync_time) FROM tracks", [], |row| row.get(0))?;
        Ok(latest.map(SyncTime::from_nanos))
    }

    fn tracks(&self) -> Result<Vec<Track>, StoreError> {
        let sql = format!("{} ORDER BY path", self.select_sql);
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([], row_to_track)?;

        let mut tracks = Vec::new();
        for track in rows {
            tracks.push(track?);
        }
        Ok(tracks)
    }
}

impl Drop for SqliteCatalog {
    fn drop(&mut self) {
        if !self.conn.is_autocommit() {
            let _ = self.conn.execute_batch("ROLLBACK");
        }
    }
}
