// Copyright (c) 2025 Spendlog Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

pub fn build_cli() -> Command {
    Command::new("spendlog")
        .version(crate_version!())
        .about("Personal finance ledger with multi-currency reports")
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Create or migrate the database"))
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(tx_fields(
                    Command::new("add").about("Record a transaction"),
                ))
                .subcommand(
                    json_flags(filter_args(
                        Command::new("list").about("List transactions, newest first"),
                    ))
                    .arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_name("N")
                            .value_parser(value_parser!(usize))
                            .help("Show at most N transactions"),
                    ),
                )
                .subcommand(tx_fields(
                    Command::new("update")
                        .about("Replace every field of a transaction")
                        .arg(id_arg()),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(id_arg()),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated views over the ledger")
                .subcommand(
                    json_flags(filter_args(
                        Command::new("summary").about("Income, expense and balance"),
                    ))
                    .arg(
                        Arg::new("in")
                            .long("in")
                            .value_name("CCY")
                            .help("Convert totals into this currency at display time"),
                    ),
                )
                .subcommand(json_flags(filter_args(
                    Command::new("by-category").about("Totals per category"),
                )))
                .subcommand(
                    json_flags(filter_args(
                        Command::new("monthly").about("Income and expense per month"),
                    ))
                    .arg(
                        Arg::new("months")
                            .long("months")
                            .value_name("N")
                            .value_parser(value_parser!(usize))
                            .help("Show at most N months (default 12)"),
                    ),
                )
                .subcommand(json_flags(filter_args(
                    Command::new("by-currency").about("Totals per currency"),
                ))),
        )
        .subcommand(
            Command::new("fx")
                .about("Exchange rates and conversion")
                .subcommand(
                    Command::new("set-base")
                        .about("Set the base currency assumed for new transactions")
                        .arg(Arg::new("currency").required(true).value_name("CCY")),
                )
                .subcommand(
                    Command::new("convert")
                        .about("Convert an amount between currencies")
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .value_name("AMOUNT"),
                        )
                        .arg(Arg::new("from").long("from").required(true).value_name("CCY"))
                        .arg(Arg::new("to").long("to").required(true).value_name("CCY")),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export ledger data")
                .subcommand(
                    Command::new("transactions")
                        .about("Export all transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .value_name("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true).value_name("FILE")),
                ),
        )
        .subcommand(
            Command::new("serve")
                .about("Serve the ledger over HTTP")
                .arg(
                    Arg::new("addr")
                        .long("addr")
                        .default_value("127.0.0.1:3000")
                        .value_name("HOST:PORT"),
                ),
        )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_name("ID")
        .value_parser(value_parser!(i64))
}

fn tx_fields(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("amount")
            .long("amount")
            .required(true)
            .value_name("AMOUNT")
            .help("Positive decimal amount"),
    )
    .arg(
        Arg::new("kind")
            .long("kind")
            .required(true)
            .value_name("KIND")
            .help("income or expense"),
    )
    .arg(
        Arg::new("category")
            .long("category")
            .value_name("NAME")
            .help("Defaults to 'General'"),
    )
    .arg(
        Arg::new("currency")
            .long("currency")
            .value_name("CCY")
            .help("Defaults to the base currency"),
    )
    .arg(
        Arg::new("date")
            .long("date")
            .value_name("DATE")
            .help("YYYY-MM-DD, defaults to today"),
    )
    .arg(Arg::new("notes").long("notes").value_name("TEXT"))
}

fn filter_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("from")
            .long("from")
            .value_name("DATE")
            .help("Inclusive lower date bound (YYYY-MM-DD)"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .value_name("DATE")
            .help("Inclusive upper date bound (YYYY-MM-DD)"),
    )
    .arg(
        Arg::new("kind")
            .long("kind")
            .value_name("KIND")
            .action(ArgAction::Append)
            .help("income or expense; may be repeated"),
    )
    .arg(
        Arg::new("category")
            .long("category")
            .value_name("NAME")
            .action(ArgAction::Append)
            .help("Category name; may be repeated"),
    )
    .arg(
        Arg::new("currency")
            .long("currency")
            .value_name("CCY")
            .help("Only transactions in this currency"),
    )
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}
