// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calc::summarize_record;
use crate::reconcile::reconcile;
use crate::snapshot::record_id;
use crate::utils::{LoadedRecord, load_records, parse_as_of, pretty_table};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let now = parse_as_of(sub.get_one::<String>("as_of"))?;
    let records = load_records(conn, sub.get_one::<String>("path"))?;
    let rows = diagnose(&records, now);

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Payment", "Issue", "Detail"], rows));
    }
    Ok(())
}

/// One `[payment, issue, detail]` row per problem found.
pub fn diagnose(records: &[LoadedRecord], now: DateTime<Utc>) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        match summarize_record(&rec.body, now) {
            Ok((payment, summary)) => {
                for adv in reconcile(&payment, &summary) {
                    rows.push(vec![payment.label(), adv.kind.to_string(), adv.message]);
                }
            }
            Err(e) => {
                let id = record_id(&rec.body)
                    .unwrap_or_else(|| format!("{} #{}", rec.source, i + 1));
                rows.push(vec![id, "invalid_input".into(), e.to_string()]);
            }
        }
    }
    rows
}
