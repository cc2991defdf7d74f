// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and migrations.
//!
//! All reads and writes go through tokio-rusqlite's single background
//! thread. Do NOT open a second `Connection` to the same file for writes:
//! the archive's read-modify-write cycles rely on that thread being the
//! only writer.

use std::path::Path;

use async_trait::async_trait;
use spiritbytes_config::model::StorageConfig;
use spiritbytes_core::{AdapterType, HealthStatus, PluginAdapter, SpiritError};
use tracing::{debug, info};

use crate::migrations;

/// Handle to the SpiritBytes SQLite database. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
    path: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

/// Map a tokio-rusqlite error to the storage variant.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> SpiritError {
    SpiritError::Storage {
        source: Box::new(e),
    }
}

impl Database {
    /// Open the database described by the storage config.
    pub async fn open(config: &StorageConfig) -> Result<Self, SpiritError> {
        Self::open_path(&config.database_path, config.wal_mode).await
    }

    /// Open (creating if needed) the database file at `path` and migrate it.
    pub async fn open_path(path: &str, wal_mode: bool) -> Result<Self, SpiritError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SpiritError::Storage {
                    source: Box::new(e),
                })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| SpiritError::Storage {
                source: Box::new(e),
            })?;

        let db = Self {
            conn,
            path: path.to_string(),
        };
        db.initialize(wal_mode).await?;
        info!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// In-memory database, mainly for tests.
    pub async fn open_in_memory() -> Result<Self, SpiritError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| SpiritError::Storage {
                source: Box::new(e),
            })?;
        let db = Self {
            conn,
            path: ":memory:".to_string(),
        };
        db.initialize(false).await?;
        Ok(db)
    }

    async fn initialize(&self, wal_mode: bool) -> Result<(), SpiritError> {
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                if wal_mode {
                    let mode: String = conn.pragma_update_and_check(
                        None,
                        "journal_mode",
                        "WAL",
                        |row| row.get(0),
                    )?;
                    debug!(mode, "journal mode set");
                }
                conn.pragma_update(None, "synchronous", "NORMAL")?;
                conn.busy_timeout(std::time::Duration::from_secs(5))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        self.conn
            .call(|conn| -> Result<Result<(), SpiritError>, rusqlite::Error> {
                Ok(migrations::run_migrations(conn))
            })
            .await
            .map_err(map_tr_err)?
    }

    /// The single-writer connection. Query modules call through this.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Checkpoint the WAL so the main file is self-contained, then drop
    /// this handle.
    pub async fn close(self) -> Result<(), SpiritError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!(path = %self.path, "database checkpointed");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for Database {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, SpiritError> {
        let result = self
            .conn
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT COUNT(*) FROM kv_entries", [], |row| row.get(0))
            })
            .await;
        Ok(match result {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }
}
