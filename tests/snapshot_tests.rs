// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use feebalance::models::TransactionStatus;
use feebalance::snapshot::{parse_timestamp, record_id, records_from_json};
use feebalance::{FeePayment, InputFault, PaymentStatus};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn decodes_populated_backend_record() {
    let record = json!({
        "_id": "65f0c0ffee0000000000abcd",
        "student": { "_id": "65f0c0ffee00000000000001", "name": "Asha Rao" },
        "feePlan": { "_id": "65f0c0ffee00000000000002", "name": "B.Tech 2025 Sem 1" },
        "course": "65f0c0ffee00000000000003",
        "totalAmount": 45000.5,
        "amountPaid": 20000,
        "scholarshipApplied": 5000,
        "customScholarship": { "type": "Sports", "amount": "1500.25" },
        "discountApplied": 0,
        "lateFeeApplied": 250,
        "dueDate": "2025-07-15T00:00:00.000Z",
        "status": "partially_paid",
        "transactions": [
            { "transactionId": "TXN-1", "amount": 15000, "paymentMethod": "UPI", "status": "completed",
              "paymentDate": "2025-06-01T10:00:00.000Z" },
            { "transactionId": "TXN-2", "amount": 5000, "paymentMethod": "Cash", "status": "completed" },
            { "transactionId": "TXN-3", "amount": 1000, "paymentMethod": "Credit Card", "status": "failed" }
        ],
        "paymentHistory": []
    });
    let p = FeePayment::from_json(&record).unwrap();
    assert_eq!(p.id.as_deref(), Some("65f0c0ffee0000000000abcd"));
    assert_eq!(p.student.as_deref(), Some("Asha Rao"));
    assert_eq!(p.fee_plan.as_deref(), Some("B.Tech 2025 Sem 1"));
    assert_eq!(p.course.as_deref(), Some("65f0c0ffee00000000000003"));
    assert_eq!(p.total_amount, dec("45000.5"));
    assert_eq!(p.custom_scholarship_amount(), dec("1500.25"));
    assert_eq!(p.total_scholarship(), Some(dec("6500.25")));
    assert_eq!(p.status, Some(PaymentStatus::PartiallyPaid));
    assert_eq!(p.due_date, Utc.with_ymd_and_hms(2025, 7, 15, 0, 0, 0).unwrap());
    assert_eq!(p.transactions.len(), 3);
    assert_eq!(
        p.transactions[0].payment_date,
        Some(Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap())
    );
    assert_eq!(p.transactions[1].payment_date, None);
    assert_eq!(p.transactions[2].status, TransactionStatus::Failed);
    assert_eq!(p.completed_total(), Some(dec("20000")));
}

#[test]
fn missing_and_null_amounts_count_as_zero() {
    let record = json!({
        "totalAmount": 1000,
        "scholarshipApplied": null,
        "customScholarship": null,
        "dueDate": "2025-01-31"
    });
    let p = FeePayment::from_json(&record).unwrap();
    assert_eq!(p.amount_paid, Decimal::ZERO);
    assert_eq!(p.scholarship_applied, Decimal::ZERO);
    assert_eq!(p.discount_applied, Decimal::ZERO);
    assert_eq!(p.late_fee_applied, Decimal::ZERO);
    assert!(p.custom_scholarship.is_none());
    assert!(p.status.is_none());
    assert!(p.transactions.is_empty());
}

#[test]
fn json_numbers_keep_their_decimal_digits() {
    let record = json!({ "totalAmount": 1234.56, "amountPaid": 0.1, "dueDate": "2025-01-31" });
    let p = FeePayment::from_json(&record).unwrap();
    assert_eq!(p.total_amount.to_string(), "1234.56");
    assert_eq!(p.amount_paid.to_string(), "0.1");
}

#[test]
fn long_json_numbers_are_not_rounded_through_floats() {
    let record: Value = serde_json::from_str(
        r#"{ "totalAmount": 1234567890123456789.123456, "amountPaid": 0.30000000000000004441,
             "dueDate": "2025-01-31" }"#,
    )
    .unwrap();
    let p = FeePayment::from_json(&record).unwrap();
    assert_eq!(p.total_amount, dec("1234567890123456789.123456"));
    assert_eq!(p.amount_paid, dec("0.30000000000000004441"));
}

#[test]
fn numeric_ids_are_kept_as_text() {
    let p = FeePayment::from_json(&json!({ "_id": 42, "dueDate": "2025-01-31" })).unwrap();
    assert_eq!(p.id.as_deref(), Some("42"));
    assert_eq!(record_id(&json!({ "id": " r-7 " })).as_deref(), Some("r-7"));
    assert_eq!(record_id(&json!({ "_id": "", "id": 9 })).as_deref(), Some("9"));
    assert_eq!(record_id(&json!({ "_id": null })), None);
}

#[test]
fn bad_payment_date_is_located() {
    let record = json!({
        "totalAmount": 1000,
        "dueDate": "2025-01-31",
        "transactions": [
            { "amount": 10, "paymentDate": null },
            { "amount": 20, "paymentDate": "last tuesday" }
        ]
    });
    let err = FeePayment::from_json(&record).unwrap_err();
    assert_eq!(err.field(), "transactions[1].paymentDate");
    assert_eq!(err.fault(), &InputFault::Unparsable("last tuesday".into()));

    let record = json!({
        "totalAmount": 1000,
        "dueDate": "2025-01-31",
        "transactions": [ { "amount": 10, "paymentDate": 1717200000 } ]
    });
    let err = FeePayment::from_json(&record).unwrap_err();
    assert_eq!(err.field(), "transactions[0].paymentDate");
    assert!(matches!(err.fault(), InputFault::Unparsable(_)));
}

#[test]
fn non_numeric_amount_names_the_field() {
    let record = json!({ "totalAmount": 1000, "amountPaid": "abc", "dueDate": "2025-01-31" });
    let err = FeePayment::from_json(&record).unwrap_err();
    assert_eq!(err.field(), "amountPaid");
    assert_eq!(err.fault(), &InputFault::NotNumeric("abc".into()));

    for bad in [json!(true), json!([1]), json!({"v": 1}), json!(""), json!("NaN")] {
        let record = json!({ "totalAmount": bad, "dueDate": "2025-01-31" });
        let err = FeePayment::from_json(&record).unwrap_err();
        assert_eq!(err.field(), "totalAmount");
        assert!(matches!(err.fault(), InputFault::NotNumeric(_)));
    }
}

#[test]
fn negative_amount_is_rejected() {
    let record = json!({
        "totalAmount": 1000,
        "customScholarship": { "amount": -10 },
        "dueDate": "2025-01-31"
    });
    let err = FeePayment::from_json(&record).unwrap_err();
    assert_eq!(err.field(), "customScholarship.amount");
    assert_eq!(err.fault(), &InputFault::Negative(dec("-10")));
}

#[test]
fn bad_transaction_amount_is_located() {
    let record = json!({
        "totalAmount": 1000,
        "dueDate": "2025-01-31",
        "transactions": [ { "amount": 10 }, { "amount": "ten" } ]
    });
    let err = FeePayment::from_json(&record).unwrap_err();
    assert_eq!(err.field(), "transactions[1].amount");
}

#[test]
fn due_date_problems_are_invalid_input() {
    let missing = json!({ "totalAmount": 1000 });
    let err = FeePayment::from_json(&missing).unwrap_err();
    assert_eq!(err.field(), "dueDate");
    assert_eq!(err.fault(), &InputFault::Missing);

    let numeric = json!({ "totalAmount": 1000, "dueDate": 1735689600000u64 });
    let err = FeePayment::from_json(&numeric).unwrap_err();
    assert!(matches!(err.fault(), InputFault::Unparsable(_)));
}

#[test]
fn unknown_status_label_is_rejected() {
    let record = json!({ "totalAmount": 1, "dueDate": "2025-01-31", "status": "paid" });
    let err = FeePayment::from_json(&record).unwrap_err();
    assert_eq!(err.field(), "status");
    assert_eq!(err.fault(), &InputFault::UnknownLabel("paid".into()));

    let record = json!({ "totalAmount": 1, "dueDate": "2025-01-31", "status": "OverPayed" });
    let p = FeePayment::from_json(&record).unwrap();
    assert_eq!(p.status, Some(PaymentStatus::OverPayed));
}

#[test]
fn non_object_record_is_rejected() {
    let err = FeePayment::from_json(&json!([1, 2])).unwrap_err();
    assert_eq!(err.fault(), &InputFault::NotAnObject);
}

#[test]
fn timestamp_formats() {
    let midnight = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    assert_eq!(parse_timestamp("2025-03-01"), Some(midnight));
    assert_eq!(parse_timestamp("2025-03-01T00:00:00.000Z"), Some(midnight));
    assert_eq!(parse_timestamp("2025-03-01T05:30:00+05:30"), Some(midnight));
    assert_eq!(
        parse_timestamp("2025-03-01T10:30:00"),
        Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 30, 0).unwrap())
    );
    assert_eq!(parse_timestamp("not-a-date"), None);
    assert_eq!(parse_timestamp("2025-02-30"), None);
}

#[test]
fn envelopes_are_unwrapped() {
    let one = json!({ "_id": "a" });
    assert_eq!(records_from_json(json!([one, one])).len(), 2);
    assert_eq!(records_from_json(json!({ "docs": [one] })).len(), 1);
    assert_eq!(records_from_json(json!({ "success": true, "data": [one, one, one] })).len(), 3);
    assert_eq!(records_from_json(json!({ "data": { "docs": [one] } })).len(), 1);
    assert_eq!(records_from_json(one.clone()), vec![one]);
    assert!(records_from_json(json!(null)).is_empty());
}
