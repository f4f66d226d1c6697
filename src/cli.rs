// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn source_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("path")
            .long("path")
            .help("Read payment records from a JSON file instead of the local store"),
    )
    .arg(
        Arg::new("as_of")
            .long("as-of")
            .help("Reference time for overdue checks (YYYY-MM-DD or RFC 3339); defaults to now"),
    )
}

pub fn build_cli() -> Command {
    Command::new("feebalance")
        .version(crate_version!())
        .about("Fee balance, overdue and reconciliation checks for college fee payments")
        .subcommand(Command::new("init").about("Create the local snapshot store"))
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show").about("Show current settings"))
                .subcommand(
                    Command::new("set-currency")
                        .about("Currency code used when printing amounts")
                        .arg(Arg::new("currency").required(true)),
                )
                .subcommand(
                    Command::new("set-api")
                        .about("Base URL of the fee backend, e.g. https://host/api")
                        .arg(Arg::new("url").required(true)),
                )
                .subcommand(
                    Command::new("set-token")
                        .about("Bearer token sent to the fee backend")
                        .arg(Arg::new("token").required(true)),
                )
                .subcommand(Command::new("clear-token").about("Forget the stored bearer token")),
        )
        .subcommand(
            Command::new("payments")
                .about("Manage stored fee payment snapshots")
                .subcommand(
                    Command::new("import")
                        .about("Import payment records from a JSON file")
                        .arg(Arg::new("path").long("path").required(true)),
                )
                .subcommand(
                    Command::new("fetch")
                        .about("Fetch a student's payment records from the backend")
                        .arg(Arg::new("student").long("student").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List stored snapshots"),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a stored snapshot by backend id or <source>#<index> key")
                        .arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(json_flags(source_args(
            Command::new("summary").about("Balance and overdue status per payment"),
        )))
        .subcommand(source_args(
            Command::new("report")
                .about("Aggregate totals across payments")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print pretty JSON"),
                ),
        ))
        .subcommand(source_args(
            Command::new("doctor").about("Find invalid records and status mismatches"),
        ))
        .subcommand(
            Command::new("export")
                .about("Export derived summaries")
                .subcommand(source_args(
                    Command::new("summaries")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )),
        )
}
