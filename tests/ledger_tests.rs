// Copyright (c) 2025 Spendlog Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

use spendlog::db;
use spendlog::error::LedgerError;
use spendlog::ledger::{self, Filter};
use spendlog::models::{Kind, TransactionInput};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn input(amount: &str, kind: Kind, category: &str, currency: &str, day: &str) -> TransactionInput {
    TransactionInput {
        amount: amount.parse().unwrap(),
        kind,
        category: Some(category.to_string()),
        currency: Some(currency.to_string()),
        date: Some(date(day)),
        notes: None,
    }
}

#[test]
fn add_then_list_round_trips_all_fields() {
    let conn = setup();
    let mut given = input("499.99", Kind::Expense, "Food", "INR", "2024-03-01");
    given.notes = Some("lunch with friends".to_string());
    let id = ledger::add(&conn, &given).unwrap();

    let txns = ledger::list(&conn, &Filter::default()).unwrap();
    assert_eq!(txns.len(), 1);
    let t = &txns[0];
    assert_eq!(t.id, id);
    assert_eq!(t.amount, "499.99".parse::<Decimal>().unwrap());
    assert_eq!(t.kind, Kind::Expense);
    assert_eq!(t.category, "Food");
    assert_eq!(t.currency, "INR");
    assert_eq!(t.date, date("2024-03-01"));
    assert_eq!(t.notes.as_deref(), Some("lunch with friends"));
}

#[test]
fn add_applies_defaults_for_omitted_fields() {
    let conn = setup();
    let given = TransactionInput {
        amount: "42".parse().unwrap(),
        kind: Kind::Income,
        category: None,
        currency: None,
        date: None,
        notes: None,
    };
    ledger::add(&conn, &given).unwrap();

    let txns = ledger::list(&conn, &Filter::default()).unwrap();
    assert_eq!(txns[0].category, "General");
    assert_eq!(txns[0].currency, "USD");
    assert_eq!(txns[0].date, chrono::Local::now().date_naive());
    assert_eq!(txns[0].notes, None);
}

#[test]
fn add_uses_configured_base_currency() {
    let conn = setup();
    ledger::set_base_currency(&conn, "inr").unwrap();
    let given = TransactionInput {
        amount: "10".parse().unwrap(),
        kind: Kind::Expense,
        category: None,
        currency: None,
        date: Some(date("2024-01-15")),
        notes: None,
    };
    ledger::add(&conn, &given).unwrap();
    assert_eq!(ledger::base_currency(&conn).unwrap(), "INR");
    assert_eq!(ledger::list(&conn, &Filter::default()).unwrap()[0].currency, "INR");
}

#[test]
fn zero_and_negative_amounts_are_rejected() {
    let conn = setup();
    for amount in ["0", "-1", "-0.01"] {
        let given = input(amount, Kind::Expense, "Food", "USD", "2024-03-01");
        let err = ledger::add(&conn, &given).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)), "amount {}", amount);
    }
    assert!(ledger::list(&conn, &Filter::default()).unwrap().is_empty());
}

#[test]
fn update_missing_id_is_not_found() {
    let conn = setup();
    let given = input("10", Kind::Income, "Salary", "USD", "2024-03-01");
    let err = ledger::update(&conn, 99, &given).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(99)));
}

#[test]
fn delete_missing_id_is_not_found() {
    let conn = setup();
    let err = ledger::delete(&conn, 7).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(7)));
}

#[test]
fn delete_removes_the_row() {
    let conn = setup();
    let id = ledger::add(&conn, &input("10", Kind::Income, "Salary", "USD", "2024-03-01")).unwrap();
    ledger::delete(&conn, id).unwrap();
    assert!(ledger::list(&conn, &Filter::default()).unwrap().is_empty());
    assert!(matches!(
        ledger::delete(&conn, id).unwrap_err(),
        LedgerError::NotFound(_)
    ));
}

#[test]
fn update_changing_only_category_preserves_the_rest() {
    let conn = setup();
    let given = input("250", Kind::Expense, "Food", "INR", "2024-03-05");
    let id = ledger::add(&conn, &given).unwrap();

    let mut changed = given.clone();
    changed.category = Some("Groceries".to_string());
    ledger::update(&conn, id, &changed).unwrap();

    let txns = ledger::list(&conn, &Filter::default()).unwrap();
    assert_eq!(txns.len(), 1);
    let t = &txns[0];
    assert_eq!(t.category, "Groceries");
    assert_eq!(t.amount, "250".parse::<Decimal>().unwrap());
    assert_eq!(t.kind, Kind::Expense);
    assert_eq!(t.date, date("2024-03-05"));
    assert_eq!(t.currency, "INR");
}

#[test]
fn update_rejects_invalid_amount() {
    let conn = setup();
    let id = ledger::add(&conn, &input("10", Kind::Income, "Salary", "USD", "2024-03-01")).unwrap();
    let mut bad = input("10", Kind::Income, "Salary", "USD", "2024-03-01");
    bad.amount = Decimal::ZERO;
    assert!(matches!(
        ledger::update(&conn, id, &bad).unwrap_err(),
        LedgerError::Validation(_)
    ));
}

#[test]
fn list_orders_by_date_desc_then_insertion_desc() {
    let conn = setup();
    ledger::add(&conn, &input("1", Kind::Expense, "A", "USD", "2024-03-01")).unwrap();
    ledger::add(&conn, &input("2", Kind::Expense, "B", "USD", "2024-03-03")).unwrap();
    ledger::add(&conn, &input("3", Kind::Expense, "C", "USD", "2024-03-02")).unwrap();
    // Same date as the second row; inserted later, so it comes first.
    ledger::add(&conn, &input("4", Kind::Expense, "D", "USD", "2024-03-03")).unwrap();

    let txns = ledger::list(&conn, &Filter::default()).unwrap();
    let categories: Vec<&str> = txns.iter().map(|t| t.category.as_str()).collect();
    assert_eq!(categories, vec!["D", "B", "C", "A"]);
}

#[test]
fn list_date_range_with_no_matches_is_empty_not_an_error() {
    let conn = setup();
    ledger::add(&conn, &input("10", Kind::Expense, "Food", "USD", "2024-03-01")).unwrap();
    let filter = Filter {
        from: Some(date("2024-01-01")),
        to: Some(date("2024-01-31")),
        ..Filter::default()
    };
    assert!(ledger::list(&conn, &filter).unwrap().is_empty());
}

#[test]
fn list_filters_by_kind_category_and_currency() {
    let conn = setup();
    ledger::add(&conn, &input("10", Kind::Expense, "Food", "INR", "2024-03-01")).unwrap();
    ledger::add(&conn, &input("20", Kind::Income, "Salary", "INR", "2024-03-02")).unwrap();
    ledger::add(&conn, &input("30", Kind::Expense, "Food", "USD", "2024-03-03")).unwrap();

    let filter = Filter {
        kinds: vec![Kind::Expense],
        ..Filter::default()
    };
    assert_eq!(ledger::list(&conn, &filter).unwrap().len(), 2);

    let filter = Filter {
        categories: vec!["Salary".to_string()],
        ..Filter::default()
    };
    assert_eq!(ledger::list(&conn, &filter).unwrap().len(), 1);

    let filter = Filter {
        currency: Some("inr".to_string()),
        ..Filter::default()
    };
    assert_eq!(ledger::list(&conn, &filter).unwrap().len(), 2);

    let filter = Filter {
        kinds: vec![Kind::Expense],
        currency: Some("USD".to_string()),
        ..Filter::default()
    };
    let txns = ledger::list(&conn, &filter).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].amount, "30".parse::<Decimal>().unwrap());
}

#[test]
fn list_is_a_restartable_snapshot() {
    let conn = setup();
    ledger::add(&conn, &input("10", Kind::Expense, "Food", "USD", "2024-03-01")).unwrap();
    let first = ledger::list(&conn, &Filter::default()).unwrap();
    let second = ledger::list(&conn, &Filter::default()).unwrap();
    assert_eq!(first, second);
}
