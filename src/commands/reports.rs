// Copyright (c) 2025 Spendlog Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::commands::transactions::filter_from_matches;
use crate::fx::{FrankfurterSource, FxCache};
use crate::ledger::{self, GroupBy};
use crate::models::Kind;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("by-category", sub)) => by_category(conn, sub)?,
        Some(("monthly", sub)) => monthly(conn, sub)?,
        Some(("by-currency", sub)) => by_currency(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct Summary {
    income: Decimal,
    expense: Decimal,
    balance: Decimal,
    currency: Option<String>,
    conversion_degraded: bool,
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filter = filter_from_matches(sub)?;

    let (income, expense, currency, degraded) =
        if let Some(target) = sub.get_one::<String>("in") {
            let target = target.to_uppercase();
            let mut cache = FxCache::new(FrankfurterSource::new()?);
            let mut income = Decimal::ZERO;
            let mut expense = Decimal::ZERO;
            let mut degraded = false;
            for t in ledger::list(conn, &filter)? {
                let converted = cache.convert(t.amount, &t.currency, &target);
                degraded |= converted.degraded;
                match t.kind {
                    Kind::Income => income += converted.amount,
                    Kind::Expense => expense += converted.amount,
                }
            }
            (income, expense, Some(target), degraded)
        } else {
            let totals = ledger::aggregate(conn, &filter, GroupBy::Kind)?;
            let income = totals
                .get(Kind::Income.as_str())
                .copied()
                .unwrap_or(Decimal::ZERO);
            let expense = totals
                .get(Kind::Expense.as_str())
                .copied()
                .unwrap_or(Decimal::ZERO);
            (income, expense, None, false)
        };

    if degraded {
        eprintln!("warning: exchange rates unavailable; unconverted amounts counted 1:1");
    }
    let report = Summary {
        income,
        expense,
        balance: income - expense,
        currency: currency.clone(),
        conversion_degraded: degraded,
    };
    if !maybe_print_json(json_flag, jsonl_flag, &report)? {
        let header = match &currency {
            Some(ccy) => format!("Amount ({})", ccy),
            None => "Amount".to_string(),
        };
        let rows = vec![
            vec!["Income".to_string(), format!("{:.2}", report.income)],
            vec!["Expense".to_string(), format!("{:.2}", report.expense)],
            vec!["Balance".to_string(), format!("{:.2}", report.balance)],
        ];
        println!("{}", pretty_table(&["Total", &header], rows));
    }
    Ok(())
}

#[derive(Serialize)]
struct CategoryRow {
    category: String,
    total: Decimal,
}

fn by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filter = filter_from_matches(sub)?;
    let totals = ledger::aggregate(conn, &filter, GroupBy::Category)?;
    let mut data: Vec<CategoryRow> = totals
        .into_iter()
        .map(|(category, total)| CategoryRow { category, total })
        .collect();
    data.sort_by(|a, b| b.total.cmp(&a.total));
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|r| vec![r.category.clone(), format!("{:.2}", r.total)])
            .collect();
        println!("{}", pretty_table(&["Category", "Total"], rows));
    }
    Ok(())
}

#[derive(Serialize)]
struct MonthRow {
    month: String,
    income: Decimal,
    expense: Decimal,
}

fn monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    let filter = filter_from_matches(sub)?;
    let totals = ledger::aggregate(conn, &filter, GroupBy::MonthKind)?;

    // Keys are "YYYY-MM kind"; fold the two kinds back into one row per month.
    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for (key, total) in totals {
        let Some((month, kind)) = key.rsplit_once(' ') else {
            continue;
        };
        let entry = map
            .entry(month.to_string())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match kind {
            "income" => entry.0 += total,
            _ => entry.1 += total,
        }
    }
    let data: Vec<MonthRow> = map
        .iter()
        .rev()
        .take(months)
        .map(|(month, (income, expense))| MonthRow {
            month: month.clone(),
            income: *income,
            expense: *expense,
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.month.clone(),
                    format!("{:.2}", r.income),
                    format!("{:.2}", r.expense),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expense"], rows));
    }
    Ok(())
}

#[derive(Serialize)]
struct CurrencyRow {
    currency: String,
    total: Decimal,
}

fn by_currency(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filter = filter_from_matches(sub)?;
    let totals = ledger::aggregate(conn, &filter, GroupBy::Currency)?;
    let data: Vec<CurrencyRow> = totals
        .into_iter()
        .map(|(currency, total)| CurrencyRow { currency, total })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|r| vec![r.currency.clone(), format!("{:.2}", r.total)])
            .collect();
        println!("{}", pretty_table(&["Currency", "Total"], rows));
    }
    Ok(())
}
