// Copyright (c) 2025 Spendlog Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{self, Filter};
use crate::models::{Kind, TransactionInput};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("update", sub)) => update(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let input = input_from_matches(sub)?;
    let id = ledger::add(conn, &input)?;
    println!("Recorded {} of {} (id {})", input.kind, input.amount, id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.category.clone(),
                    t.amount.to_string(),
                    t.currency.clone(),
                    t.notes.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Kind", "Category", "Amount", "CCY", "Notes"],
                rows,
            )
        );
    }
    Ok(())
}

fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let input = input_from_matches(sub)?;
    ledger::update(conn, id, &input)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    ledger::delete(conn, id)?;
    println!("Deleted transaction {}", id);
    Ok(())
}

pub fn query_rows(
    conn: &Connection,
    sub: &clap::ArgMatches,
) -> Result<Vec<crate::models::Transaction>> {
    let filter = filter_from_matches(sub)?;
    let mut data = ledger::list(conn, &filter)?;
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}

pub fn input_from_matches(sub: &clap::ArgMatches) -> Result<TransactionInput> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let kind: Kind = sub
        .get_one::<String>("kind")
        .unwrap()
        .trim()
        .to_lowercase()
        .parse()?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };
    Ok(TransactionInput {
        amount,
        kind,
        category: sub.get_one::<String>("category").cloned(),
        currency: sub.get_one::<String>("currency").cloned(),
        date,
        notes: sub.get_one::<String>("notes").cloned(),
    })
}

pub fn filter_from_matches(sub: &clap::ArgMatches) -> Result<Filter> {
    let mut filter = Filter::default();
    if let Some(s) = sub.get_one::<String>("from") {
        filter.from = Some(parse_date(s)?);
    }
    if let Some(s) = sub.get_one::<String>("to") {
        filter.to = Some(parse_date(s)?);
    }
    if let Some(kinds) = sub.get_many::<String>("kind") {
        for k in kinds {
            filter.kinds.push(k.trim().to_lowercase().parse::<Kind>()?);
        }
    }
    if let Some(categories) = sub.get_many::<String>("category") {
        filter.categories = categories.cloned().collect();
    }
    filter.currency = sub.get_one::<String>("currency").map(|s| s.to_uppercase());
    Ok(filter)
}
