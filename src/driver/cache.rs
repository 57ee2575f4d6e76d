use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::driver::error::CacheError;
use crate::driver::platform::Platform;

/// A driver binary previously downloaded into the data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedDriver {
    pub version: String,
    pub platform: Platform,
    pub path: PathBuf,
    pub size: u64,
    pub downloaded_at: DateTime<Utc>,
}

impl CachedDriver {
    /// Whether the recorded file still exists with the recorded size
    pub fn is_intact(&self) -> bool {
        std::fs::metadata(&self.path)
            .map(|meta| meta.is_file() && meta.len() == self.size)
            .unwrap_or(false)
    }
}

pub struct DriverCache {
    conn: Mutex<Connection>,
}

impl DriverCache {
    pub fn new(db_path: &Path) -> Result<Self, CacheError> {
        info!("Initializing driver cache at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let cache = Self {
            conn: Mutex::new(conn),
        };

        cache.create_schema()?;
        debug!("Driver cache ready");

        Ok(cache)
    }

    /// Acquire database connection lock with proper error handling
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::LockPoisoned)
    }

    fn create_schema(&self) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS drivers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                version TEXT NOT NULL,
                platform TEXT NOT NULL,
                path TEXT NOT NULL,
                size INTEGER NOT NULL,
                downloaded_at INTEGER NOT NULL,
                UNIQUE(version, platform)
            )
            "#,
            [],
        )?;

        Ok(())
    }

    /// Look up a cached driver
    pub fn get(
        &self,
        version: &str,
        platform: Platform,
    ) -> Result<Option<CachedDriver>, CacheError> {
        let conn = self.lock_conn()?;
        let row = conn
            .query_row(
                r#"
                SELECT path, size, downloaded_at FROM drivers
                WHERE version = ?1 AND platform = ?2
                "#,
                (version, platform.as_str()),
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.map(|(path, size, downloaded_at)| CachedDriver {
            version: version.to_string(),
            platform,
            path: PathBuf::from(path),
            size: u64::try_from(size).unwrap_or(0),
            downloaded_at: DateTime::from_timestamp_millis(downloaded_at).unwrap_or_default(),
        }))
    }

    /// Record a downloaded driver, replacing any previous entry
    pub fn record(
        &self,
        version: &str,
        platform: Platform,
        path: &Path,
        size: u64,
    ) -> Result<(), CacheError> {
        let now = Utc::now().timestamp_millis();
        let size = i64::try_from(size).unwrap_or(i64::MAX);
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            INSERT INTO drivers (version, platform, path, size, downloaded_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(version, platform) DO UPDATE SET
                path = excluded.path,
                size = excluded.size,
                downloaded_at = excluded.downloaded_at
            "#,
            (
                version,
                platform.as_str(),
                path.to_string_lossy(),
                size,
                now,
            ),
        )?;

        Ok(())
    }

    /// Remove a cached driver entry. Returns true if an entry existed.
    pub fn remove(&self, version: &str, platform: Platform) -> Result<bool, CacheError> {
        let conn = self.lock_conn()?;
        let removed = conn.execute(
            "DELETE FROM drivers WHERE version = ?1 AND platform = ?2",
            (version, platform.as_str()),
        )?;
        Ok(removed > 0)
    }

    /// All cached drivers, most recently downloaded first
    pub fn list(&self) -> Result<Vec<CachedDriver>, CacheError> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT version, platform, path, size, downloaded_at FROM drivers
            ORDER BY downloaded_at DESC, id DESC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|(version, platform, path, size, downloaded_at)| {
                let platform = platform.parse().ok()?;
                Some(CachedDriver {
                    version,
                    platform,
                    path: PathBuf::from(path),
                    size: u64::try_from(size).unwrap_or(0),
                    downloaded_at: DateTime::from_timestamp_millis(downloaded_at)
                        .unwrap_or_default(),
                })
            })
            .collect())
    }
}
