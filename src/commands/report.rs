// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calc::summarize_record;
use crate::report::FeeReport;
use crate::utils::{
    LoadedRecord, fmt_money, get_currency, load_records, maybe_print_json, parse_as_of,
    pretty_table,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let now = parse_as_of(sub.get_one::<String>("as_of"))?;
    let records = load_records(conn, sub.get_one::<String>("path"))?;
    let report = build_report(&records, now);

    if !maybe_print_json(json_flag, false, &report)? {
        let ccy = get_currency(conn)?;
        let m = |d: rust_decimal::Decimal| fmt_money(&d, &ccy);
        let mut rows = vec![
            vec!["Payments".into(), report.payments.to_string()],
            vec!["Invalid records".into(), report.invalid.to_string()],
            vec!["Total billed".into(), m(report.total_billed)],
            vec!["Scholarships".into(), m(report.total_scholarships)],
            vec!["Discounts".into(), m(report.total_discounts)],
            vec!["Fines".into(), m(report.total_fines)],
            vec!["Total due".into(), m(report.total_due)],
            vec!["Collected".into(), m(report.total_collected)],
            vec!["Outstanding".into(), m(report.outstanding)],
            vec!["Credit (overpaid)".into(), m(report.credit)],
            vec![
                "Overdue".into(),
                format!("{} ({})", report.overdue_count, m(report.overdue_amount)),
            ],
            vec!["Waived".into(), report.waived_count.to_string()],
        ];
        for (status, n) in &report.by_status {
            rows.push(vec![format!("Derived: {}", status), n.to_string()]);
        }
        println!(
            "As of {}\n{}",
            now.format("%Y-%m-%d %H:%M UTC"),
            pretty_table(&["Metric", "Value"], rows)
        );
    }
    Ok(())
}

pub fn build_report(records: &[LoadedRecord], now: DateTime<Utc>) -> FeeReport {
    let mut report = FeeReport::default();
    for rec in records {
        let added = summarize_record(&rec.body, now)
            .and_then(|(payment, summary)| report.add(&payment, &summary));
        if let Err(e) = added {
            tracing::warn!(source = %rec.source, error = %e, "excluding invalid fee payment from report");
            report.add_invalid();
        }
    }
    report
}
