// Copyright (c) 2025 Spendlog Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::fx::{FrankfurterSource, FxCache};
use crate::ledger;
use crate::utils::{fmt_money, parse_decimal};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-base", sub)) => {
            let ccy = sub.get_one::<String>("currency").unwrap();
            ledger::set_base_currency(conn, ccy)?;
            println!("Base currency set to {}", ccy.trim().to_uppercase());
        }
        Some(("convert", sub)) => convert_amount(sub)?,
        _ => {}
    }
    Ok(())
}

fn convert_amount(sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let from = sub.get_one::<String>("from").unwrap().to_uppercase();
    let to = sub.get_one::<String>("to").unwrap().to_uppercase();
    let mut cache = FxCache::new(FrankfurterSource::new()?);
    let converted = cache.convert(amount, &from, &to);
    if converted.degraded {
        eprintln!("warning: exchange rate unavailable; amount shown 1:1");
    }
    println!(
        "{} -> {}",
        fmt_money(&amount, &from),
        fmt_money(&converted.amount, &to)
    );
    Ok(())
}
