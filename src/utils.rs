// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::db;
use crate::snapshot::{parse_timestamp, records_from_json};

const UA: &str = concat!("feebalance/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_CURRENCY: &str = "INR";
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

static OBJECT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").unwrap());

pub fn http_client(token: Option<&str>) -> Result<reqwest::blocking::Client> {
    let mut headers = HeaderMap::new();
    if let Some(t) = token {
        let mut v = HeaderValue::from_str(&format!("Bearer {}", t))
            .context("API token contains characters not allowed in a header")?;
        v.set_sensitive(true);
        headers.insert(AUTHORIZATION, v);
    }
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .default_headers(headers)
        .build()?;
    Ok(c)
}

pub fn is_object_id(s: &str) -> bool {
    OBJECT_ID.is_match(s)
}

/// Reference time for overdue checks; wall clock when not given.
pub fn parse_as_of(s: Option<&String>) -> Result<DateTime<Utc>> {
    match s {
        Some(raw) => parse_timestamp(raw).ok_or_else(|| {
            anyhow!(
                "Invalid time '{}', expected YYYY-MM-DD or an RFC 3339 timestamp",
                raw
            )
        }),
        None => Ok(Utc::now()),
    }
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

// Settings

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn delete_setting(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
    Ok(())
}

pub fn get_currency(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, "currency")?.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
}

pub fn api_base(conn: &Connection) -> Result<String> {
    if let Ok(v) = std::env::var("FEEBALANCE_API") {
        if !v.trim().is_empty() {
            return Ok(v.trim().trim_end_matches('/').to_string());
        }
    }
    Ok(get_setting(conn, "api_base")?
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
        .trim_end_matches('/')
        .to_string())
}

pub fn api_token(conn: &Connection) -> Result<Option<String>> {
    if let Ok(v) = std::env::var("FEEBALANCE_TOKEN") {
        if !v.trim().is_empty() {
            return Ok(Some(v.trim().to_string()));
        }
    }
    get_setting(conn, "api_token")
}

// Records

/// A raw payment record and where it came from.
pub struct LoadedRecord {
    pub source: String,
    pub body: Value,
}

pub fn read_records_file(path: &str) -> Result<Vec<Value>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Read payments file {}", path))?;
    let value: Value =
        serde_json::from_str(&text).with_context(|| format!("Parse JSON in {}", path))?;
    Ok(records_from_json(value))
}

/// Records from `path` when given, otherwise from the local snapshot store.
pub fn load_records(conn: &Connection, path: Option<&String>) -> Result<Vec<LoadedRecord>> {
    if let Some(p) = path {
        let p = p.trim();
        return Ok(read_records_file(p)?
            .into_iter()
            .map(|body| LoadedRecord {
                source: p.to_string(),
                body,
            })
            .collect());
    }
    Ok(db::stored_payments(conn)?
        .into_iter()
        .map(|s| LoadedRecord {
            source: s.source,
            body: s.body,
        })
        .collect())
}
