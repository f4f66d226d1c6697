// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::summary::{SummaryRow, summary_rows};
use crate::utils::{load_records, parse_as_of};
use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summaries", sub)) => export_summaries(conn, sub),
        _ => Ok(()),
    }
}

fn export_summaries(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim().to_string();
    let now = parse_as_of(sub.get_one::<String>("as_of"))?;
    let records = load_records(conn, sub.get_one::<String>("path"))?;
    let rows = summary_rows(&records, now);

    match fmt.as_str() {
        "csv" => write_csv(&out, &rows)?,
        "json" => std::fs::write(&out, serde_json::to_string_pretty(&rows)?)
            .with_context(|| format!("Write {}", out))?,
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    tracing::info!(rows = rows.len(), out = %out, "exported summaries");
    println!("Exported {} summaries to {}", rows.len(), out);
    Ok(())
}

fn write_csv(out: &str, rows: &[SummaryRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
    wtr.write_record([
        "id",
        "student",
        "fee_plan",
        "total_amount",
        "amount_paid",
        "scholarship",
        "discount",
        "late_fee",
        "total_due",
        "balance",
        "is_overdue",
        "recorded_status",
        "effective_status",
        "error",
    ])?;
    let amt = |d: Option<Decimal>| d.map(|v| format!("{:.2}", v.round_dp(2))).unwrap_or_default();
    for r in rows {
        let overdue = match r.is_overdue {
            Some(b) => b.to_string(),
            None => "unknown".to_string(),
        };
        wtr.write_record([
            r.id.clone(),
            r.student.clone(),
            r.fee_plan.clone(),
            amt(r.total_amount),
            amt(r.amount_paid),
            amt(r.scholarship),
            amt(r.discount),
            amt(r.late_fee),
            amt(r.total_due),
            amt(r.balance),
            overdue,
            r.recorded_status.clone(),
            r.effective_status.clone().unwrap_or_default(),
            r.error.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
