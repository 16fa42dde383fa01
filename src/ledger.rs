// Copyright (c) 2025 Spendlog Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The transaction ledger: validation, CRUD and grouped sums over the
//! `transactions` table. Everything here is stateless between calls; the
//! store's own transactional guarantees make each statement atomic.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter, types::Type};
use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::models::{DEFAULT_CATEGORY, Kind, Transaction, TransactionInput};

/// Optional restrictions applied to `list`, `aggregate` and `balance`.
///
/// Date bounds are inclusive. Empty vectors mean no restriction. The default
/// filter matches every transaction.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kinds: Vec<Kind>,
    pub categories: Vec<String>,
    pub currency: Option<String>,
}

/// Grouping axis for `aggregate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    /// Keys "income" / "expense".
    Kind,
    /// Keys are category names.
    Category,
    /// Keys "YYYY-MM income" / "YYYY-MM expense".
    MonthKind,
    /// Keys are currency codes.
    Currency,
}

/// Insert a validated transaction, returning the newly assigned id.
pub fn add(conn: &Connection, input: &TransactionInput) -> Result<i64, LedgerError> {
    let (category, currency, date) = resolve(conn, input)?;
    conn.execute(
        "INSERT INTO transactions(amount, type, category, currency, date, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            input.amount.to_string(),
            input.kind.as_str(),
            category,
            currency,
            date.to_string(),
            input.notes
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Return transactions matching `filter`, ordered by date descending with
/// ties broken by insertion order (most recent first).
///
/// An empty result is `Ok(vec![])`, never an error.
pub fn list(conn: &Connection, filter: &Filter) -> Result<Vec<Transaction>, LedgerError> {
    let (clause, args) = filter_clause(filter);
    let sql = format!(
        "SELECT id, amount, type, category, currency, date, notes
         FROM transactions WHERE 1=1{} ORDER BY date DESC, id DESC",
        clause
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter()), map_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Replace every field of the transaction with the given id.
///
/// Validation matches `add`. The replacement happens in a single UPDATE, so a
/// concurrent reader never observes a partially updated row.
pub fn update(conn: &Connection, id: i64, input: &TransactionInput) -> Result<(), LedgerError> {
    let (category, currency, date) = resolve(conn, input)?;
    let changed = conn.execute(
        "UPDATE transactions SET amount=?1, type=?2, category=?3, currency=?4, date=?5, notes=?6
         WHERE id=?7",
        params![
            input.amount.to_string(),
            input.kind.as_str(),
            category,
            currency,
            date.to_string(),
            input.notes,
            id
        ],
    )?;
    if changed == 0 {
        return Err(LedgerError::NotFound(id));
    }
    Ok(())
}

/// Remove the transaction with the given id. Deleting a missing id is an
/// error, matching `update`.
pub fn delete(conn: &Connection, id: i64) -> Result<(), LedgerError> {
    let changed = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if changed == 0 {
        return Err(LedgerError::NotFound(id));
    }
    Ok(())
}

/// Sum `amount` over transactions matching `filter`, grouped along the given
/// axis. An empty matching set yields an empty map.
pub fn aggregate(
    conn: &Connection,
    filter: &Filter,
    group_by: GroupBy,
) -> Result<BTreeMap<String, Decimal>, LedgerError> {
    let key_expr = match group_by {
        GroupBy::Kind => "type",
        GroupBy::Category => "category",
        GroupBy::MonthKind => "substr(date,1,7) || ' ' || type",
        GroupBy::Currency => "currency",
    };
    let (clause, args) = filter_clause(filter);
    let sql = format!(
        "SELECT {}, amount FROM transactions WHERE 1=1{}",
        key_expr, clause
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter()), |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for row in rows {
        let (key, amount) = row?;
        let amount = parse_stored_decimal(&amount, 1)?;
        *totals.entry(key).or_insert(Decimal::ZERO) += amount;
    }
    Ok(totals)
}

/// Income minus expense over the filtered set.
pub fn balance(conn: &Connection, filter: &Filter) -> Result<Decimal, LedgerError> {
    let totals = aggregate(conn, filter, GroupBy::Kind)?;
    let income = totals.get(Kind::Income.as_str()).copied().unwrap_or(Decimal::ZERO);
    let expense = totals.get(Kind::Expense.as_str()).copied().unwrap_or(Decimal::ZERO);
    Ok(income - expense)
}

/// The currency assumed when a transaction does not name one.
pub fn base_currency(conn: &Connection) -> Result<String, LedgerError> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='base_currency'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.unwrap_or_else(|| "USD".to_string()))
}

pub fn set_base_currency(conn: &Connection, ccy: &str) -> Result<(), LedgerError> {
    let ccy = ccy.trim().to_uppercase();
    if ccy.is_empty() {
        return Err(LedgerError::Validation("currency must not be empty".into()));
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('base_currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![ccy],
    )?;
    Ok(())
}

/// Validate the input and fill in defaults for the optional fields.
///
/// Amounts must be strictly positive; zero is rejected.
fn resolve(
    conn: &Connection,
    input: &TransactionInput,
) -> Result<(String, String, NaiveDate), LedgerError> {
    if input.amount <= Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "amount must be greater than zero, got {}",
            input.amount
        )));
    }
    let category = match &input.category {
        Some(c) if !c.trim().is_empty() => c.trim().to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    };
    let currency = match &input.currency {
        Some(c) if !c.trim().is_empty() => c.trim().to_uppercase(),
        _ => base_currency(conn)?,
    };
    let date = input
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    Ok((category, currency, date))
}

fn filter_clause(filter: &Filter) -> (String, Vec<String>) {
    let mut sql = String::new();
    let mut args: Vec<String> = Vec::new();
    if let Some(from) = filter.from {
        sql.push_str(" AND date>=?");
        args.push(from.to_string());
    }
    if let Some(to) = filter.to {
        sql.push_str(" AND date<=?");
        args.push(to.to_string());
    }
    if !filter.kinds.is_empty() {
        let marks = vec!["?"; filter.kinds.len()].join(",");
        sql.push_str(&format!(" AND type IN ({})", marks));
        args.extend(filter.kinds.iter().map(|k| k.as_str().to_string()));
    }
    if !filter.categories.is_empty() {
        let marks = vec!["?"; filter.categories.len()].join(",");
        sql.push_str(&format!(" AND category IN ({})", marks));
        args.extend(filter.categories.iter().cloned());
    }
    if let Some(ccy) = &filter.currency {
        sql.push_str(" AND currency=?");
        args.push(ccy.to_uppercase());
    }
    (sql, args)
}

fn map_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    let amount: String = r.get(1)?;
    let kind: String = r.get(2)?;
    Ok(Transaction {
        id: r.get(0)?,
        amount: parse_stored_decimal(&amount, 1)?,
        kind: Kind::from_str(&kind)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?,
        category: r.get(3)?,
        currency: r.get(4)?,
        date: r.get(5)?,
        notes: r.get(6)?,
    })
}

fn parse_stored_decimal(s: &str, idx: usize) -> rusqlite::Result<Decimal> {
    s.parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
