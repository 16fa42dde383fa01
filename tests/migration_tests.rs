// Copyright (c) 2025 Spendlog Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;

use spendlog::db;
use spendlog::ledger::{self, Filter};
use spendlog::models::Kind;

#[test]
fn init_schema_is_idempotent() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO transactions(amount, type, category, currency, date)
         VALUES ('10', 'expense', 'Food', 'USD', '2024-03-01')",
        [],
    )
    .unwrap();

    db::init_schema(&mut conn).unwrap();
    db::init_schema(&mut conn).unwrap();

    let txns = ledger::list(&conn, &Filter::default()).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].category, "Food");
}

#[test]
fn open_or_init_at_is_safe_on_every_startup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite");

    let conn = db::open_or_init_at(&path).unwrap();
    conn.execute(
        "INSERT INTO transactions(amount, type, category, currency, date)
         VALUES ('25', 'income', 'Salary', 'USD', '2024-03-01')",
        [],
    )
    .unwrap();
    drop(conn);

    let conn = db::open_or_init_at(&path).unwrap();
    let txns = ledger::list(&conn, &Filter::default()).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].amount, "25".parse::<Decimal>().unwrap());
}

#[test]
fn legacy_table_gains_currency_and_notes_columns() {
    let mut conn = Connection::open_in_memory().unwrap();
    // Schema from before the currency and notes columns were added.
    conn.execute_batch(
        r#"
        CREATE TABLE transactions(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount TEXT NOT NULL,
            type TEXT NOT NULL CHECK(type IN ('income','expense')),
            category TEXT NOT NULL DEFAULT 'General',
            date TEXT NOT NULL
        );
        "#,
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(amount, type, category, date)
         VALUES ('250', 'expense', 'Food', '2024-03-05')",
        [],
    )
    .unwrap();

    db::init_schema(&mut conn).unwrap();

    let txns = ledger::list(&conn, &Filter::default()).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].kind, Kind::Expense);
    assert_eq!(txns[0].currency, "USD");
    assert_eq!(txns[0].notes, None);

    // The migrated table accepts new writes through the normal path.
    let input = spendlog::models::TransactionInput {
        amount: "5".parse().unwrap(),
        kind: Kind::Income,
        category: None,
        currency: Some("EUR".to_string()),
        date: None,
        notes: Some("post-migration".to_string()),
    };
    ledger::add(&conn, &input).unwrap();
    assert_eq!(ledger::list(&conn, &Filter::default()).unwrap().len(), 2);
}
