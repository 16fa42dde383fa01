// Copyright (c) 2025 Spendlog Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;

use spendlog::models::{Kind, TransactionInput};
use spendlog::{cli, commands, db, ledger};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    let input = TransactionInput {
        amount: "499.99".parse().unwrap(),
        kind: Kind::Expense,
        category: Some("Food".to_string()),
        currency: Some("INR".to_string()),
        date: Some(NaiveDate::parse_from_str("2024-03-01", "%Y-%m-%d").unwrap()),
        notes: Some("lunch".to_string()),
    };
    ledger::add(&conn, &input).unwrap();
    conn
}

fn run_export(conn: &Connection, args: &[&str]) {
    let matches = cli::build_cli().get_matches_from(args);
    let Some(("export", sub)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    commands::exporter::handle(conn, sub).unwrap();
}

#[test]
fn exports_csv_with_header_and_rows() {
    let conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("txns.csv");
    run_export(
        &conn,
        &[
            "spendlog",
            "export",
            "transactions",
            "--format",
            "csv",
            "--out",
            out.to_str().unwrap(),
        ],
    );

    let contents = std::fs::read_to_string(&out).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "id,date,type,category,amount,currency,notes"
    );
    let row = lines.next().unwrap();
    assert!(row.contains("2024-03-01"));
    assert!(row.contains("expense"));
    assert!(row.contains("499.99"));
    assert!(row.contains("INR"));
}

#[test]
fn exports_json_array() {
    let conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("txns.json");
    run_export(
        &conn,
        &[
            "spendlog",
            "export",
            "transactions",
            "--format",
            "json",
            "--out",
            out.to_str().unwrap(),
        ],
    );

    let contents = std::fs::read_to_string(&out).unwrap();
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0]["type"], "expense");
    assert_eq!(parsed[0]["category"], "Food");
    assert_eq!(parsed[0]["notes"], "lunch");
}
