// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL files under `migrations/` are compiled into the binary and applied
//! when the database is opened.

use spiritbytes_core::SpiritError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), SpiritError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(|e| SpiritError::Storage {
            source: Box::new(e),
        })?;
    Ok(())
}
