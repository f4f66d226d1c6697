// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{remove_payment, stored_payments, upsert_payment};
use crate::snapshot::records_from_json;
use crate::utils::{
    api_base, api_token, http_client, is_object_id, maybe_print_json, pretty_table,
    read_records_file,
};
use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("import", sub)) => import(conn, sub)?,
        Some(("fetch", sub)) => fetch(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let n = remove_payment(conn, id)?;
            if n == 0 {
                println!("No stored payment with id {}", id);
            } else {
                println!("Removed payment {}", id);
            }
        }
        _ => {}
    }
    Ok(())
}

fn import(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let records = read_records_file(path)?;
    let n = store_records(conn, path, &records)?;
    println!("Imported {} payment records from {}", n, path);
    Ok(())
}

fn fetch(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let student = sub.get_one::<String>("student").unwrap().trim();
    if !is_object_id(student) {
        bail!("Invalid student id '{}', expected 24 hex digits", student);
    }
    let url = format!("{}/fee-payments/student/{}", api_base(conn)?, student);
    let client = http_client(api_token(conn)?.as_deref())?;
    tracing::info!(%url, "fetching fee payments");
    let resp = client
        .get(&url)
        .send()
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?;
    let body: Value = resp.json().context("Backend response is not JSON")?;
    let records = records_from_json(body);
    let n = store_records(conn, &format!("api:student/{}", student), &records)?;
    println!("Fetched {} payment records for student {}", n, student);
    Ok(())
}

/// Store every record in one transaction.
pub fn store_records(conn: &mut Connection, source: &str, records: &[Value]) -> Result<usize> {
    let tx = conn.transaction()?;
    for (index, rec) in records.iter().enumerate() {
        if !rec.is_object() {
            tracing::warn!(source, index, "skipping non-object payment record");
            continue;
        }
        upsert_payment(&tx, source, index, rec)?;
    }
    tx.commit()?;
    let n = records.iter().filter(|r| r.is_object()).count();
    tracing::info!(source, count = n, "stored payment snapshots");
    Ok(n)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRow {
    pub id: String,
    pub source: String,
    pub imported_at: String,
    pub status: String,
    pub due_date: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let text = |v: &Value, key: &str| {
        v.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let data: Vec<StoredRow> = stored_payments(conn)?
        .into_iter()
        .map(|s| StoredRow {
            id: s.record_id.unwrap_or(s.key),
            status: text(&s.body, "status"),
            due_date: text(&s.body, "dueDate"),
            source: s.source,
            imported_at: s.imported_at,
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|r| vec![r.id, r.status, r.due_date, r.source, r.imported_at])
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Status", "Due", "Source", "Imported"], rows)
        );
    }
    Ok(())
}
