// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::snapshot::record_id;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Feebalance", "feebalance"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("feebalance.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- raw backend snapshots; decoded and validated on every read
    CREATE TABLE IF NOT EXISTS payment_snapshots(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        record_key TEXT NOT NULL UNIQUE,
        record_id TEXT,
        source TEXT NOT NULL,
        body TEXT NOT NULL,
        imported_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )
    .context("Initialize schema")?;
    Ok(())
}

/// Key a snapshot is stored under: the backend id when the record has one,
/// otherwise its position within the import it came from.
pub fn record_key(source: &str, index: usize, body: &Value) -> String {
    record_id(body).unwrap_or_else(|| format!("{}#{}", source, index))
}

/// Insert a snapshot, replacing any earlier one with the same key. Re-importing
/// the same source therefore never duplicates records that lack an id.
pub fn upsert_payment(conn: &Connection, source: &str, index: usize, body: &Value) -> Result<()> {
    conn.execute(
        "INSERT INTO payment_snapshots(record_key, record_id, source, body) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(record_key) DO UPDATE SET record_id=excluded.record_id,
         source=excluded.source, body=excluded.body, imported_at=datetime('now')",
        params![
            record_key(source, index, body),
            record_id(body),
            source,
            serde_json::to_string(body)?
        ],
    )?;
    Ok(())
}

pub struct StoredPayment {
    pub key: String,
    pub record_id: Option<String>,
    pub source: String,
    pub imported_at: String,
    pub body: Value,
}

pub fn stored_payments(conn: &Connection) -> Result<Vec<StoredPayment>> {
    let mut stmt = conn.prepare(
        "SELECT record_key, record_id, source, imported_at, body FROM payment_snapshots ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (key, record_id, source, imported_at, body) = row?;
        let body: Value = serde_json::from_str(&body)
            .with_context(|| format!("Stored payment {} is not valid JSON", key))?;
        out.push(StoredPayment {
            key,
            record_id,
            source,
            imported_at,
            body,
        });
    }
    Ok(out)
}

/// Remove by backend id or by the positional key shown for id-less records.
pub fn remove_payment(conn: &Connection, id: &str) -> Result<usize> {
    let n = conn.execute(
        "DELETE FROM payment_snapshots WHERE record_key=?1 OR record_id=?1",
        params![id],
    )?;
    Ok(n)
}
