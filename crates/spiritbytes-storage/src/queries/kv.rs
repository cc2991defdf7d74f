// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value operations over the `kv_entries` table.

use chrono::Utc;
use rusqlite::{OptionalExtension, TransactionBehavior, params};
use spiritbytes_core::SpiritError;

use crate::database::{Database, map_tr_err};

/// What an [`update`] closure wants done with the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvWrite {
    Keep,
    Put(String),
    Delete,
}

/// Get the value stored under `key`.
pub async fn get(db: &Database, key: &str) -> Result<Option<String>, SpiritError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Read several keys from one consistent snapshot.
pub async fn get_many(db: &Database, keys: &[&str]) -> Result<Vec<Option<String>>, SpiritError> {
    let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let mut values = Vec::with_capacity(keys.len());
            {
                let mut stmt = tx.prepare("SELECT value FROM kv_entries WHERE key = ?1")?;
                for key in &keys {
                    values.push(stmt.query_row(params![key], |row| row.get(0)).optional()?);
                }
            }
            tx.commit()?;
            Ok(values)
        })
        .await
        .map_err(map_tr_err)
}

/// Insert or replace the value under `key`.
pub async fn put(db: &Database, key: &str, value: &str) -> Result<(), SpiritError> {
    put_many(db, vec![(key.to_string(), value.to_string())]).await
}

/// Write several keys in one transaction.
pub async fn put_many(db: &Database, entries: Vec<(String, String)>) -> Result<(), SpiritError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            for (key, value) in &entries {
                upsert(&tx, key, value)?;
            }
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

/// Remove `key`. Missing keys are not an error.
pub async fn delete(db: &Database, key: &str) -> Result<(), SpiritError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Atomic read-modify-write of one key.
///
/// `f` sees the current value and decides what to write. Read, decision
/// and write happen inside one IMMEDIATE transaction on the writer thread,
/// so concurrent updates of the same key are applied one after another and
/// none is lost. If `f` fails nothing is written.
pub async fn update<T, F>(db: &Database, key: &str, f: F) -> Result<T, SpiritError>
where
    F: FnOnce(Option<String>) -> Result<(KvWrite, T), SpiritError> + Send + 'static,
    T: Send + 'static,
{
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<Result<T, SpiritError>, rusqlite::Error> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let current: Option<String> = tx
                .query_row(
                    "SELECT value FROM kv_entries WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;

            let (write, output) = match f(current) {
                Ok(decision) => decision,
                Err(e) => return Ok(Err(e)),
            };

            match write {
                KvWrite::Keep => {}
                KvWrite::Put(value) => upsert(&tx, &key, &value)?,
                KvWrite::Delete => {
                    tx.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
                }
            }
            tx.commit()?;
            Ok(Ok(output))
        })
        .await
        .map_err(map_tr_err)?
}

fn upsert(tx: &rusqlite::Transaction<'_>, key: &str, value: &str) -> Result<(), rusqlite::Error> {
    tx.execute(
        "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_delete() {
        let db = Database::open_in_memory().await.unwrap();
        assert_eq!(get(&db, "a").await.unwrap(), None);

        put(&db, "a", "1").await.unwrap();
        put(&db, "a", "2").await.unwrap();
        assert_eq!(get(&db, "a").await.unwrap().as_deref(), Some("2"));

        delete(&db, "a").await.unwrap();
        delete(&db, "a").await.unwrap();
        assert_eq!(get(&db, "a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_many_preserves_order() {
        let db = Database::open_in_memory().await.unwrap();
        put_many(
            &db,
            vec![("x".into(), "1".into()), ("z".into(), "3".into())],
        )
        .await
        .unwrap();
        let values = get_many(&db, &["z", "y", "x"]).await.unwrap();
        assert_eq!(
            values,
            vec![Some("3".to_string()), None, Some("1".to_string())]
        );
    }

    #[tokio::test]
    async fn failed_update_writes_nothing() {
        let db = Database::open_in_memory().await.unwrap();
        put(&db, "k", "before").await.unwrap();

        let result: Result<(), _> = update(&db, "k", |_| {
            Err(SpiritError::Internal("refuse".into()))
        })
        .await;
        assert!(matches!(result, Err(SpiritError::Internal(_))));
        assert_eq!(get(&db, "k").await.unwrap().as_deref(), Some("before"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_are_serialized() {
        let db = Database::open_in_memory().await.unwrap();
        let mut handles = Vec::new();
        for _ in 0..50 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                update(&db, "counter", |current| {
                    let n: u32 = current.as_deref().unwrap_or("0").parse().unwrap_or(0);
                    Ok((KvWrite::Put((n + 1).to_string()), ()))
                })
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(get(&db, "counter").await.unwrap().as_deref(), Some("50"));
    }
}
