// Copyright (c) 2025 Spendlog Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("dev.spendlog", "Spendlog", "spendlog"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("spendlog.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    open_or_init_at(&path)
}

pub fn open_or_init_at(path: &Path) -> Result<Connection> {
    let mut conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

/// Create the schema if absent and apply additive migrations.
///
/// Safe to call on every startup: repeated calls neither error nor touch
/// existing rows. Older databases created before the `currency` and `notes`
/// columns existed gain them here with safe defaults.
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        amount TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        category TEXT NOT NULL DEFAULT 'General',
        currency TEXT NOT NULL DEFAULT 'USD',
        date TEXT NOT NULL,
        notes TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    "#,
    )?;
    migrate_transactions(conn)?;
    Ok(())
}

fn migrate_transactions(conn: &Connection) -> Result<()> {
    let cols = table_columns(conn, "transactions")?;
    if !cols.contains("currency") {
        conn.execute(
            "ALTER TABLE transactions ADD COLUMN currency TEXT NOT NULL DEFAULT 'USD'",
            [],
        )?;
    }
    if !cols.contains("notes") {
        conn.execute("ALTER TABLE transactions ADD COLUMN notes TEXT", [])?;
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let rows = stmt.query_map([], |r| r.get::<_, String>(1))?;
    let mut cols = HashSet::new();
    for row in rows {
        cols.insert(row?);
    }
    Ok(cols)
}
