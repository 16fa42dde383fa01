// Copyright (c) 2025 Spendlog Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::net::SocketAddr;

use anyhow::{Context, Result};

use spendlog::{cli, commands, db, server};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("fx", sub)) => commands::fx::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("serve", sub)) => {
            let addr: SocketAddr = sub
                .get_one::<String>("addr")
                .unwrap()
                .parse()
                .context("Invalid listen address, expected HOST:PORT")?;
            server::run(addr, conn)?;
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
