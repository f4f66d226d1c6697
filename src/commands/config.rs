// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    api_base, api_token, delete_setting, get_currency, pretty_table, set_setting,
};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let token = if api_token(conn)?.is_some() {
                "(set)"
            } else {
                "(none)"
            };
            let rows = vec![
                vec!["currency".to_string(), get_currency(conn)?],
                vec!["api_base".to_string(), api_base(conn)?],
                vec!["api_token".to_string(), token.to_string()],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set-currency", sub)) => {
            let ccy = sub.get_one::<String>("currency").unwrap().trim().to_uppercase();
            if ccy.is_empty() {
                bail!("Currency code cannot be empty");
            }
            set_setting(conn, "currency", &ccy)?;
            println!("Currency set to {}", ccy);
        }
        Some(("set-api", sub)) => {
            let url = sub.get_one::<String>("url").unwrap().trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                bail!("API base must start with http:// or https://, got '{}'", url);
            }
            set_setting(conn, "api_base", url.trim_end_matches('/'))?;
            println!("API base set to {}", url);
        }
        Some(("set-token", sub)) => {
            let token = sub.get_one::<String>("token").unwrap().trim();
            set_setting(conn, "api_token", token)?;
            println!("API token stored");
        }
        Some(("clear-token", _)) => {
            delete_setting(conn, "api_token")?;
            println!("API token cleared");
        }
        _ => {}
    }
    Ok(())
}
