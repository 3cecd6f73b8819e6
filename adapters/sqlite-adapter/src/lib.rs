//! sqlite-adapter — SQLite implementation of the `ContentSource` port.
//!
//! Purpose
//! - Read the host's published pages from a file-based database so the admin
//!   server can offer them as campaign destinations.
//! - Implements the `ContentSource` trait from the `domain` crate.
//!
//! Notes
//! - Uses `rusqlite` with the `bundled` feature for portability.
//! - Only rows with `status = 'publish'` are offered, ordered by
//!   `menu_order` then `title`.
//! - Pages are re-read on every call; nothing is cached here.

use std::path::Path;

use domain::{ContentSource, CoreError, DestinationCandidate};
use rusqlite::{params, Connection};

/// SQLite-backed page source.
pub struct SqlitePageSource {
    conn: std::sync::Mutex<Connection>,
    site_url: String,
}

impl SqlitePageSource {
    /// Open (or create) a SQLite database at the given path and ensure schema.
    pub fn new<P: AsRef<Path>>(path: P, site_url: impl Into<String>) -> Result<Self, CoreError> {
        let conn = Connection::open(path).map_err(map_sqerr)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: std::sync::Mutex::new(conn),
            site_url: site_url.into(),
        })
    }

    /// Open at `db_path`, creating its parent directory first.
    pub fn open_creating_dir(db_path: &Path, site_url: impl Into<String>) -> Result<Self, CoreError> {
        if let Some(dir) = db_path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        Self::new(db_path, site_url)
    }

    /// Insert or replace a page row.
    pub fn upsert_page(
        &self,
        id: i64,
        title: &str,
        url: &str,
        status: &str,
        menu_order: i64,
    ) -> Result<(), CoreError> {
        let conn = self.conn.lock().map_err(|_| CoreError::ContentSource("mutex poisoned".into()))?;
        conn.execute(
            "INSERT OR REPLACE INTO pages(id, title, url, status, menu_order) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, title, url, status, menu_order],
        )
        .map_err(map_sqerr)?;
        Ok(())
    }
}

fn init_schema(conn: &Connection) -> Result<(), CoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS pages (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            url TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'publish',
            menu_order INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_pages_status ON pages(status);
        "#,
    )
    .map_err(map_sqerr)?;
    Ok(())
}

fn map_sqerr<E: std::fmt::Display>(e: E) -> CoreError { CoreError::ContentSource(format!("sqlite error: {e}")) }

fn row_to_candidate(row: &rusqlite::Row) -> Result<DestinationCandidate, CoreError> {
    let id: i64 = row.get(0).map_err(map_sqerr)?;
    let title: String = row.get(1).map_err(map_sqerr)?;
    let url: String = row.get(2).map_err(map_sqerr)?;
    Ok(DestinationCandidate {
        id: id.to_string(),
        title,
        url,
    })
}

impl ContentSource for SqlitePageSource {
    fn site_url(&self) -> Result<String, CoreError> {
        Ok(self.site_url.clone())
    }

    fn published_items(&self) -> Result<Vec<DestinationCandidate>, CoreError> {
        let conn = self.conn.lock().map_err(|_| CoreError::ContentSource("mutex poisoned".into()))?;
        let mut stmt = conn
            .prepare("SELECT id, title, url FROM pages WHERE status = 'publish' ORDER BY menu_order ASC, title ASC")
            .map_err(map_sqerr)?;
        let mut rows = stmt.query([]).map_err(map_sqerr)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(map_sqerr)? {
            out.push(row_to_candidate(row)?);
        }
        Ok(out)
    }
}
