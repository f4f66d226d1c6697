// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use feebalance::commands::report::build_report;
use feebalance::report::FeeReport;
use feebalance::utils::LoadedRecord;
use feebalance::{FeePayment, InputFault, compute_summary};
use rust_decimal::Decimal;
use serde_json::{Value, json};

fn rec(body: Value) -> LoadedRecord {
    LoadedRecord {
        source: "test".into(),
        body,
    }
}

fn d(n: i64) -> Decimal {
    Decimal::from(n)
}

#[test]
fn dashboard_totals_over_mixed_payments() {
    let records = vec![
        // 9000 due, 5000 owed, overdue
        rec(json!({ "_id": "a", "totalAmount": 10000, "amountPaid": 4000, "scholarshipApplied": 1000,
                    "dueDate": "2025-01-31", "status": "partially_paid" })),
        // settled
        rec(json!({ "_id": "b", "totalAmount": 5000, "amountPaid": 5000,
                    "dueDate": "2025-01-31", "status": "fully_paid" })),
        // overpaid by 1000
        rec(json!({ "_id": "c", "totalAmount": 5000, "amountPaid": 6000,
                    "dueDate": "2025-01-31", "status": "OverPayed" })),
        // waived, still owes 4800 on paper
        rec(json!({ "_id": "d", "totalAmount": 8000, "scholarshipApplied": 2000,
                    "customScholarship": { "amount": 1000 }, "discountApplied": 500,
                    "lateFeeApplied": 300, "dueDate": "2025-01-31", "status": "waived" })),
        // not yet due
        rec(json!({ "_id": "e", "totalAmount": 2000, "amountPaid": 500,
                    "dueDate": "2025-12-31", "status": "partially_paid" })),
        rec(json!({ "_id": "f", "totalAmount": 100, "dueDate": "not-a-date" })),
    ];
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let r = build_report(&records, now);

    assert_eq!(r.payments, 5);
    assert_eq!(r.invalid, 1);
    assert_eq!(r.total_billed, d(30000));
    assert_eq!(r.total_scholarships, d(4000));
    assert_eq!(r.total_discounts, d(500));
    assert_eq!(r.total_fines, d(300));
    assert_eq!(r.total_due, d(9000 + 5000 + 5000 + 4800 + 2000));
    assert_eq!(r.total_collected, d(4000 + 5000 + 6000 + 500));
    assert_eq!(r.outstanding, d(5000 + 1500));
    assert_eq!(r.credit, d(1000));
    assert_eq!(r.overdue_count, 1);
    assert_eq!(r.overdue_amount, d(5000));
    assert_eq!(r.waived_count, 1);
    assert_eq!(r.by_status.get("overdue"), Some(&1));
    assert_eq!(r.by_status.get("partially_paid"), Some(&1));
    assert_eq!(r.by_status.get("fully_paid"), Some(&1));
    assert_eq!(r.by_status.get("OverPayed"), Some(&1));
    assert_eq!(r.by_status.get("waived"), Some(&1));
}

#[test]
fn build_from_typed_pairs() {
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let mut p = FeePayment::new(now);
    p.total_amount = d(700);
    p.amount_paid = d(200);
    let s = compute_summary(&p, now).unwrap();
    let r = FeeReport::build([(&p, &s)]).unwrap();
    assert_eq!(r.payments, 1);
    assert_eq!(r.outstanding, d(500));
    // due exactly now is not overdue yet
    assert_eq!(r.overdue_count, 0);
}

#[test]
fn overflowing_totals_drop_the_record_not_the_report() {
    let max = "79228162514264337593543950335";
    let records = vec![
        rec(json!({ "_id": "big1", "totalAmount": max, "amountPaid": max, "dueDate": "2025-01-31" })),
        rec(json!({ "_id": "big2", "totalAmount": max, "amountPaid": max, "dueDate": "2025-01-31" })),
        rec(json!({ "_id": "small", "totalAmount": 0, "dueDate": "2025-01-31" })),
    ];
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let r = build_report(&records, now);
    assert_eq!(r.payments, 2);
    assert_eq!(r.invalid, 1);
    assert_eq!(r.total_billed, Decimal::MAX);
    assert_eq!(r.total_collected, Decimal::MAX);
    assert_eq!(r.by_status.get("fully_paid"), Some(&2));

    let mut p = FeePayment::new(now);
    p.total_amount = Decimal::MAX;
    let s = compute_summary(&p, now).unwrap();
    let err = FeeReport::build([(&p, &s), (&p, &s)]).unwrap_err();
    assert_eq!(err.field(), "totalBilled");
    assert_eq!(err.fault(), &InputFault::Overflow);
}

#[test]
fn empty_report_serializes_camel_case() {
    let v = serde_json::to_value(FeeReport::default()).unwrap();
    assert_eq!(v["payments"], json!(0));
    assert!(v.get("totalScholarships").is_some());
    assert!(v.get("overdueCount").is_some());
}
