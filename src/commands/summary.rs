// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calc::summarize_record;
use crate::utils::{
    LoadedRecord, fmt_money, get_currency, load_records, maybe_print_json, parse_as_of,
    pretty_table,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let now = parse_as_of(sub.get_one::<String>("as_of"))?;
    let records = load_records(conn, sub.get_one::<String>("path"))?;
    let data = summary_rows(&records, now);

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let ccy = get_currency(conn)?;
        let money = |d: Option<Decimal>| match d {
            Some(v) => fmt_money(&v, &ccy),
            None => "unknown".to_string(),
        };
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.student.clone(),
                    r.fee_plan.clone(),
                    money(r.total_due),
                    money(r.amount_paid),
                    money(r.balance),
                    overdue_cell(r.is_overdue),
                    r.recorded_status.clone(),
                    r.effective_status
                        .clone()
                        .or_else(|| r.error.clone())
                        .unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Student", "Fee Plan", "Total Due", "Paid", "Balance", "Overdue",
                    "Status", "Derived",
                ],
                rows,
            )
        );
    }
    Ok(())
}

pub fn overdue_cell(v: Option<bool>) -> String {
    match v {
        Some(true) => "yes".into(),
        Some(false) => "no".into(),
        None => "unknown".into(),
    }
}

/// One display/export row. Amount fields are `None` when the record could not
/// be decoded, so an unusable record never reads as "not overdue".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub id: String,
    pub student: String,
    pub fee_plan: String,
    pub total_amount: Option<Decimal>,
    pub amount_paid: Option<Decimal>,
    pub scholarship: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub late_fee: Option<Decimal>,
    pub total_due: Option<Decimal>,
    pub balance: Option<Decimal>,
    pub is_overdue: Option<bool>,
    pub recorded_status: String,
    pub effective_status: Option<String>,
    pub error: Option<String>,
}

pub fn summary_rows(records: &[LoadedRecord], now: DateTime<Utc>) -> Vec<SummaryRow> {
    records
        .iter()
        .map(|rec| match summarize_record(&rec.body, now) {
            Ok((p, s)) => SummaryRow {
                id: p.label(),
                student: p.student.clone().unwrap_or_default(),
                fee_plan: p.fee_plan.clone().unwrap_or_default(),
                total_amount: Some(p.total_amount),
                amount_paid: Some(p.amount_paid),
                scholarship: p.total_scholarship(),
                discount: Some(p.discount_applied),
                late_fee: Some(p.late_fee_applied),
                total_due: Some(s.total_due),
                balance: Some(s.balance),
                is_overdue: Some(s.is_overdue),
                recorded_status: p.status.map(|st| st.to_string()).unwrap_or_default(),
                effective_status: Some(s.effective_status(p.status).to_string()),
                error: None,
            },
            Err(e) => {
                tracing::warn!(source = %rec.source, error = %e, "skipping invalid fee payment");
                SummaryRow {
                    id: raw_str(&rec.body, "_id").unwrap_or_else(|| "(no id)".into()),
                    student: raw_str(&rec.body, "student").unwrap_or_default(),
                    fee_plan: raw_str(&rec.body, "feePlan").unwrap_or_default(),
                    total_amount: None,
                    amount_paid: None,
                    scholarship: None,
                    discount: None,
                    late_fee: None,
                    total_due: None,
                    balance: None,
                    is_overdue: None,
                    recorded_status: raw_str(&rec.body, "status").unwrap_or_default(),
                    effective_status: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect()
}

fn raw_str(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Object(o) => o
            .get("name")
            .or_else(|| o.get("_id"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
