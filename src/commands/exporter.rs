// Copyright (c) 2025 Spendlog Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::ledger::{self, Filter};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let data = ledger::list(conn, &Filter::default())?;
    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id", "date", "type", "category", "amount", "currency", "notes",
            ])?;
            for t in &data {
                wtr.write_record([
                    t.id.to_string(),
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.category.clone(),
                    t.amount.to_string(),
                    t.currency.clone(),
                    t.notes.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&data)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} transactions to {}", data.len(), out);
    Ok(())
}
